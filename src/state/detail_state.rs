//! Per-symbol detail state: company overview, latest quote and intraday bars.

use super::{LoadState, Quote};
use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Company fundamentals for one symbol.
///
/// Every field besides `symbol` is optional; the provider leaves many of them
/// blank or `"None"` for funds and foreign listings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockOverview {
    pub symbol: String,
    pub name: Option<String>,
    pub exchange: Option<String>,
    pub country: Option<String>,
    pub currency: Option<String>,
    pub description: Option<String>,
    pub industry: Option<String>,
    pub sector: Option<String>,
    pub moving_average_50: Option<Decimal>,
    pub moving_average_200: Option<Decimal>,
    pub week_52_high: Option<Decimal>,
    pub week_52_low: Option<Decimal>,
    pub market_cap: Option<Decimal>,
    pub pe_ratio: Option<Decimal>,
    pub beta: Option<Decimal>,
    pub dividend_yield: Option<Decimal>,
    pub profit_margin: Option<Decimal>,
    pub return_on_equity: Option<Decimal>,
}

impl StockOverview {
    /// Where `price` sits inside the 52-week range, from 0 (low) to 1 (high).
    pub fn range_position(&self, price: Decimal) -> Option<Decimal> {
        let (low, high) = (self.week_52_low?, self.week_52_high?);
        let width = high - low;
        if width <= Decimal::ZERO {
            return None;
        }
        Some(((price - low) / width).clamp(Decimal::ZERO, Decimal::ONE))
    }
}

/// Intraday bar width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Interval {
    #[serde(rename = "1min")]
    Min1,
    #[default]
    #[serde(rename = "5min")]
    Min5,
    #[serde(rename = "15min")]
    Min15,
    #[serde(rename = "30min")]
    Min30,
    #[serde(rename = "60min")]
    Min60,
}

impl Interval {
    /// Provider query value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Min1 => "1min",
            Self::Min5 => "5min",
            Self::Min15 => "15min",
            Self::Min30 => "30min",
            Self::Min60 => "60min",
        }
    }
}

impl std::fmt::Display for Interval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Interval {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "1min" | "1" => Ok(Self::Min1),
            "5min" | "5" => Ok(Self::Min5),
            "15min" | "15" => Ok(Self::Min15),
            "30min" | "30" => Ok(Self::Min30),
            "60min" | "60" => Ok(Self::Min60),
            other => Err(crate::Error::invalid_input(format!(
                "unknown interval '{other}'"
            ))),
        }
    }
}

/// One OHLCV bar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricePoint {
    pub timestamp: NaiveDateTime,
    pub open: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub close: Decimal,
    pub volume: u64,
}

/// State for the symbol detail screen.
#[derive(Debug, Default)]
pub struct DetailState {
    /// Symbol being shown.
    pub symbol: Option<String>,
    pub overview: Option<StockOverview>,
    pub quote: Option<Quote>,
    pub series: Vec<PricePoint>,
    pub status: LoadState,
}

impl DetailState {
    /// Switch to a new symbol, dropping data that belonged to the old one.
    pub fn select(&mut self, symbol: &str) {
        if self.symbol.as_deref() != Some(symbol) {
            self.overview = None;
            self.quote = None;
            self.series.clear();
        }
        self.symbol = Some(symbol.to_string());
        self.status = LoadState::Loading;
    }
}
