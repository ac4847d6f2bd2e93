//! Data conversion utilities for API responses.

use super::wire::{OverviewResponse, WireBar, WireGlobalQuote, WireMover, WireSearchMatch};
use crate::search::SymbolMatch;
use crate::state::{PricePoint, Quote, StockOverview};
use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use std::str::FromStr;

/// Converts validated wire records to internal state types.
pub struct DataConverter;

impl DataConverter {
    /// Convert a movers entry. `None` when it fails the entry rules:
    /// a non-empty ticker, a numeric price, and numeric change fields when present.
    pub(crate) fn convert_mover(entry: WireMover) -> Option<Quote> {
        let symbol = non_empty(entry.ticker)?;
        let price = Self::parse_decimal(entry.price.as_deref()?)?;
        let change_amount =
            Self::optional_number(entry.change_amount.as_deref(), Self::parse_decimal)?;
        let change_percentage =
            Self::optional_number(entry.change_percentage.as_deref(), Self::parse_percentage)?;

        Some(Quote {
            symbol,
            price,
            change_amount,
            change_percentage,
            volume: entry.volume.as_deref().and_then(Self::parse_volume),
        })
    }

    pub(crate) fn convert_global_quote(quote: WireGlobalQuote) -> Option<Quote> {
        Self::convert_mover(WireMover {
            ticker: quote.symbol,
            price: quote.price,
            change_amount: quote.change,
            change_percentage: quote.change_percent,
            volume: quote.volume,
        })
    }

    pub(crate) fn convert_search_match(entry: WireSearchMatch) -> Option<SymbolMatch> {
        Some(SymbolMatch {
            symbol: non_empty(entry.symbol)?,
            name: entry.name.map(|n| n.trim().to_string()).unwrap_or_default(),
            kind: non_empty(entry.security_type),
            region: non_empty(entry.region),
            currency: non_empty(entry.currency),
        })
    }

    pub(crate) fn convert_overview(raw: OverviewResponse) -> Option<StockOverview> {
        let number = |field: Option<String>| field.as_deref().and_then(Self::parse_decimal);

        Some(StockOverview {
            symbol: non_empty(raw.symbol)?,
            name: text(raw.name),
            exchange: text(raw.exchange),
            country: text(raw.country),
            currency: text(raw.currency),
            description: text(raw.description),
            industry: text(raw.industry),
            sector: text(raw.sector),
            moving_average_50: number(raw.moving_average_50),
            moving_average_200: number(raw.moving_average_200),
            week_52_high: number(raw.week_52_high),
            week_52_low: number(raw.week_52_low),
            market_cap: number(raw.market_cap),
            pe_ratio: number(raw.pe_ratio),
            beta: number(raw.beta),
            dividend_yield: number(raw.dividend_yield),
            profit_margin: number(raw.profit_margin),
            return_on_equity: number(raw.return_on_equity),
        })
    }

    /// Convert one intraday bar. Timestamps are `YYYY-MM-DD HH:MM:SS`.
    pub(crate) fn convert_bar(timestamp: &str, bar: WireBar) -> Option<PricePoint> {
        Some(PricePoint {
            timestamp: NaiveDateTime::parse_from_str(timestamp, "%Y-%m-%d %H:%M:%S").ok()?,
            open: Self::parse_decimal(bar.open.as_deref()?)?,
            high: Self::parse_decimal(bar.high.as_deref()?)?,
            low: Self::parse_decimal(bar.low.as_deref()?)?,
            close: Self::parse_decimal(bar.close.as_deref()?)?,
            volume: bar.volume.as_deref().and_then(Self::parse_volume).unwrap_or(0),
        })
    }

    /// Parse a provider number. Blank, `"None"` and `"-"` mean absent.
    pub fn parse_decimal(raw: &str) -> Option<Decimal> {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed == "None" || trimmed == "-" {
            return None;
        }
        Decimal::from_str(trimmed).ok()
    }

    /// Parse a percentage such as `"12.5%"` into `12.5`.
    pub fn parse_percentage(raw: &str) -> Option<Decimal> {
        Self::parse_decimal(raw.trim().trim_end_matches('%'))
    }

    fn parse_volume(raw: &str) -> Option<u64> {
        raw.trim().parse().ok()
    }

    /// `Some(None)` when the field is absent, `None` when present but not numeric.
    fn optional_number(
        raw: Option<&str>,
        parse: fn(&str) -> Option<Decimal>,
    ) -> Option<Option<Decimal>> {
        match raw {
            None => Some(None),
            Some(value) => parse(value).map(Some),
        }
    }
}

fn non_empty(field: Option<String>) -> Option<String> {
    field
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn text(field: Option<String>) -> Option<String> {
    non_empty(field).filter(|s| s != "None" && s != "-")
}
