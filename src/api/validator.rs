//! Response validation at the provider boundary.
//!
//! Alpha Vantage reports rate limits and bad requests inside 200 responses,
//! so every payload passes through [`ResponseValidator`] before it becomes
//! domain data. Each check yields either typed data or a tagged [`Error`].

use super::converter::DataConverter;
use super::wire::{
    GlobalQuoteResponse, MoversResponse, OverviewResponse, SearchResponse, WireMover, WireSeries,
};
use crate::error::{Error, Result};
use crate::search::SymbolMatch;
use crate::state::{Interval, Movers, PricePoint, Quote, StockOverview};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Fields the provider uses to signal errors in an otherwise successful response.
pub const SENTINEL_FIELDS: &[&str] = &["Error Message", "Note", "Information"];

/// Validates raw provider payloads.
pub struct ResponseValidator;

impl ResponseValidator {
    /// Fail with [`Error::Provider`] if a sentinel field is present.
    pub fn check_sentinels(payload: &Value) -> Result<()> {
        match Self::sentinel_message(payload) {
            Some(message) => Err(Error::provider(message)),
            None => Ok(()),
        }
    }

    /// The embedded sentinel message, if any.
    pub fn sentinel_message(payload: &Value) -> Option<String> {
        let object = payload.as_object()?;
        SENTINEL_FIELDS.iter().find_map(|field| {
            object.get(*field).map(|value| match value {
                Value::String(message) => message.clone(),
                other => other.to_string(),
            })
        })
    }

    /// Validate a `TOP_GAINERS_LOSERS` payload.
    ///
    /// Invalid entries are dropped; lists that are present but end up empty
    /// stay empty rather than failing the whole payload.
    pub fn validate_movers(payload: Value) -> Result<Movers> {
        let raw: MoversResponse = Self::decode(payload, "movers")?;

        if raw.top_gainers.is_none()
            && raw.top_losers.is_none()
            && raw.most_actively_traded.is_none()
        {
            return Err(Error::malformed("movers response has no gainers or losers lists"));
        }

        let convert = |list: Option<Vec<Value>>| -> Vec<Quote> {
            list.unwrap_or_default()
                .into_iter()
                .filter_map(|entry| serde_json::from_value::<WireMover>(entry).ok())
                .filter_map(DataConverter::convert_mover)
                .collect()
        };

        Ok(Movers {
            gainers: convert(raw.top_gainers),
            losers: convert(raw.top_losers),
            most_active: convert(raw.most_actively_traded),
            last_updated: raw.last_updated,
        })
    }

    /// Validate a `SYMBOL_SEARCH` payload.
    pub fn validate_search(payload: Value) -> Result<Vec<SymbolMatch>> {
        let raw: SearchResponse = Self::decode(payload, "symbol search")?;
        let matches = raw
            .best_matches
            .ok_or_else(|| Error::malformed("symbol search response has no bestMatches"))?;

        Ok(matches
            .into_iter()
            .filter_map(DataConverter::convert_search_match)
            .collect())
    }

    /// Validate an `OVERVIEW` payload. The provider answers `{}` for unknown symbols.
    pub fn validate_overview(payload: Value, symbol: &str) -> Result<StockOverview> {
        let raw: OverviewResponse = Self::decode(payload, "overview")?;
        DataConverter::convert_overview(raw)
            .ok_or_else(|| Error::malformed(format!("no overview data for {symbol}")))
    }

    /// Validate a `GLOBAL_QUOTE` payload.
    pub fn validate_quote(payload: Value, symbol: &str) -> Result<Quote> {
        let raw: GlobalQuoteResponse = Self::decode(payload, "global quote")?;
        raw.global_quote
            .and_then(DataConverter::convert_global_quote)
            .ok_or_else(|| Error::malformed(format!("no quote data for {symbol}")))
    }

    /// Validate a `TIME_SERIES_INTRADAY` payload. Bars come back oldest first.
    pub fn validate_intraday(payload: Value, interval: Interval) -> Result<Vec<PricePoint>> {
        Self::check_sentinels(&payload)?;

        let key = format!("Time Series ({interval})");
        let series = payload
            .get(&key)
            .cloned()
            .ok_or_else(|| Error::malformed(format!("intraday response has no '{key}'")))?;
        let series: WireSeries = serde_json::from_value(series)
            .map_err(|e| Error::malformed(format!("intraday series: {e}")))?;

        // BTreeMap keys are ISO timestamps, so iteration order is chronological.
        Ok(series
            .into_iter()
            .filter_map(|(timestamp, bar)| DataConverter::convert_bar(&timestamp, bar))
            .collect())
    }

    fn decode<T: DeserializeOwned>(payload: Value, what: &str) -> Result<T> {
        Self::check_sentinels(&payload)?;
        if !payload.is_object() {
            return Err(Error::malformed(format!("{what} response is not an object")));
        }
        serde_json::from_value(payload).map_err(|e| Error::malformed(format!("{what}: {e}")))
    }
}
