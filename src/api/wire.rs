//! Raw Alpha Vantage response shapes.
//!
//! Every field is optional: the provider omits keys freely and signals errors
//! inside 200 responses, so nothing here is trusted until validated.

use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::collections::BTreeMap;

/// `TOP_GAINERS_LOSERS` response.
#[derive(Debug, Deserialize)]
pub(crate) struct MoversResponse {
    pub last_updated: Option<String>,
    /// Entries are decoded one by one so a single bad entry only drops itself.
    pub top_gainers: Option<Vec<Value>>,
    pub top_losers: Option<Vec<Value>>,
    pub most_actively_traded: Option<Vec<Value>>,
}

/// One movers entry. Numbers are accepted as JSON strings or JSON numbers.
#[derive(Debug, Deserialize)]
pub(crate) struct WireMover {
    #[serde(default, deserialize_with = "string_or_number")]
    pub ticker: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub price: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub change_amount: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub change_percentage: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub volume: Option<String>,
}

fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// `SYMBOL_SEARCH` response.
#[derive(Debug, Deserialize)]
pub(crate) struct SearchResponse {
    #[serde(rename = "bestMatches")]
    pub best_matches: Option<Vec<WireSearchMatch>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireSearchMatch {
    #[serde(rename = "1. symbol")]
    pub symbol: Option<String>,
    #[serde(rename = "2. name")]
    pub name: Option<String>,
    #[serde(rename = "3. type")]
    pub security_type: Option<String>,
    #[serde(rename = "4. region")]
    pub region: Option<String>,
    #[serde(rename = "8. currency")]
    pub currency: Option<String>,
}

/// `GLOBAL_QUOTE` response.
#[derive(Debug, Deserialize)]
pub(crate) struct GlobalQuoteResponse {
    #[serde(rename = "Global Quote")]
    pub global_quote: Option<WireGlobalQuote>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireGlobalQuote {
    #[serde(rename = "01. symbol")]
    pub symbol: Option<String>,
    #[serde(rename = "05. price")]
    pub price: Option<String>,
    #[serde(rename = "06. volume")]
    pub volume: Option<String>,
    #[serde(rename = "09. change")]
    pub change: Option<String>,
    #[serde(rename = "10. change percent")]
    pub change_percent: Option<String>,
}

/// `OVERVIEW` response.
#[derive(Debug, Deserialize)]
pub(crate) struct OverviewResponse {
    #[serde(rename = "Symbol")]
    pub symbol: Option<String>,
    #[serde(rename = "Name")]
    pub name: Option<String>,
    #[serde(rename = "Exchange")]
    pub exchange: Option<String>,
    #[serde(rename = "Country")]
    pub country: Option<String>,
    #[serde(rename = "Currency")]
    pub currency: Option<String>,
    #[serde(rename = "Description")]
    pub description: Option<String>,
    #[serde(rename = "Industry")]
    pub industry: Option<String>,
    #[serde(rename = "Sector")]
    pub sector: Option<String>,
    #[serde(rename = "50DayMovingAverage")]
    pub moving_average_50: Option<String>,
    #[serde(rename = "200DayMovingAverage")]
    pub moving_average_200: Option<String>,
    #[serde(rename = "52WeekHigh")]
    pub week_52_high: Option<String>,
    #[serde(rename = "52WeekLow")]
    pub week_52_low: Option<String>,
    #[serde(rename = "MarketCapitalization")]
    pub market_cap: Option<String>,
    #[serde(rename = "PERatio")]
    pub pe_ratio: Option<String>,
    #[serde(rename = "Beta")]
    pub beta: Option<String>,
    #[serde(rename = "DividendYield")]
    pub dividend_yield: Option<String>,
    #[serde(rename = "ProfitMargin")]
    pub profit_margin: Option<String>,
    #[serde(rename = "ReturnOnEquityTTM")]
    pub return_on_equity: Option<String>,
}

/// One bar of `TIME_SERIES_INTRADAY`, keyed by timestamp in the series map.
#[derive(Debug, Deserialize)]
pub(crate) struct WireBar {
    #[serde(rename = "1. open")]
    pub open: Option<String>,
    #[serde(rename = "2. high")]
    pub high: Option<String>,
    #[serde(rename = "3. low")]
    pub low: Option<String>,
    #[serde(rename = "4. close")]
    pub close: Option<String>,
    #[serde(rename = "5. volume")]
    pub volume: Option<String>,
}

pub(crate) type WireSeries = BTreeMap<String, WireBar>;
