//! # Moverwatch - stock market movers in the terminal
//!
//! Shows the session's top gainers and losers from Alpha Vantage, searches
//! symbols as you type, and keeps named watchlists on disk.
//!
//! ## Architecture
//!
//! - **App**: Core application lifecycle and side effects
//! - **API**: Request client, response validation and provider operations
//! - **Cache**: TTL + LRU response cache shared by all provider calls
//! - **Search**: Debounced hybrid (local + remote) symbol search
//! - **Watchlist**: Persisted user watchlists over a key-value store
//! - **State**: Centralized state management
//! - **Events**: Line input handling
//! - **UI**: Plain-text rendering
//! - **Config**: Configuration management

pub mod api;
pub mod app;
pub mod cache;
pub mod config;
pub mod error;
pub mod events;
pub mod search;
pub mod state;
pub mod ui;
pub mod watchlist;

pub use app::App;
pub use config::Config;
pub use error::{Error, Result};
