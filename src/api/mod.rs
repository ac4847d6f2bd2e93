//! Alpha Vantage API integration.
//!
//! This module provides a high-level interface to the quote provider,
//! handling timeouts, retries, response validation and caching.

mod client;
mod converter;
mod request;
mod validator;
mod wire;

pub use client::{ApiClient, ApiClientBuilder, Payload};
pub use converter::DataConverter;
pub use request::{HttpResponse, QueryParams, ReqwestTransport, RequestClient, Transport};
pub use validator::{ResponseValidator, SENTINEL_FIELDS};

#[cfg(test)]
pub(crate) use request::MockTransport;
