//! Symbol detail widget.

use std::fmt::Write;

use rust_decimal::Decimal;

use super::{format_change, format_percentage, format_volume, truncate_string};
use crate::state::{DetailState, LoadState, StockOverview};

/// Symbol detail widget.
pub struct DetailPanel;

impl DetailPanel {
    /// Render overview, quote and chart summary for the selected symbol.
    pub fn render(out: &mut String, state: &DetailState) {
        let Some(symbol) = &state.symbol else {
            let _ = writeln!(out, "No symbol selected. Try 'overview <SYMBOL>'.");
            return;
        };

        let _ = writeln!(out, "{symbol}");
        match &state.status {
            LoadState::Loading => {
                let _ = writeln!(out, "  Loading...");
            }
            LoadState::Failed(message) => {
                let _ = writeln!(out, "  Could not load {symbol}: {message}");
            }
            LoadState::Empty => {
                let _ = writeln!(out, "  No data returned.");
            }
            LoadState::Idle | LoadState::Loaded => {}
        }

        if let Some(quote) = &state.quote {
            let _ = writeln!(
                out,
                "  Price {}  {} ({})  vol {}",
                quote.price,
                format_change(quote.change_amount),
                format_percentage(quote.change_percentage),
                format_volume(quote.volume),
            );
        }

        if let Some(overview) = &state.overview {
            Self::render_overview(out, overview, state.quote.as_ref().map(|q| q.price));
        }

        if let (Some(first), Some(last)) = (state.series.first(), state.series.last()) {
            let high = state.series.iter().map(|p| p.high).max().unwrap_or(last.high);
            let low = state.series.iter().map(|p| p.low).min().unwrap_or(last.low);
            let _ = writeln!(
                out,
                "  {} bars {} .. {}  open {} close {}  range {} - {}",
                state.series.len(),
                first.timestamp.format("%H:%M"),
                last.timestamp.format("%Y-%m-%d %H:%M"),
                first.open,
                last.close,
                low,
                high,
            );
        }
    }

    fn render_overview(out: &mut String, overview: &StockOverview, price: Option<Decimal>) {
        if let Some(name) = &overview.name {
            let exchange = overview.exchange.as_deref().unwrap_or("-");
            let _ = writeln!(out, "  {name} ({exchange})");
        }
        if let (Some(sector), Some(industry)) = (&overview.sector, &overview.industry) {
            let _ = writeln!(out, "  {sector} / {industry}");
        }

        let fields = [
            ("Market cap", overview.market_cap),
            ("P/E", overview.pe_ratio),
            ("Beta", overview.beta),
            ("Div yield", overview.dividend_yield),
            ("50d MA", overview.moving_average_50),
            ("200d MA", overview.moving_average_200),
            ("52w high", overview.week_52_high),
            ("52w low", overview.week_52_low),
        ];
        for (label, value) in fields {
            if let Some(value) = value {
                let _ = writeln!(out, "  {label:<11} {value}");
            }
        }

        if let Some(position) = price.and_then(|p| overview.range_position(p)) {
            let pct = (position * Decimal::ONE_HUNDRED).round();
            let _ = writeln!(out, "  {pct}% of 52-week range");
        }
        if let Some(description) = &overview.description {
            let _ = writeln!(out, "  {}", truncate_string(description, 160));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Quote;
    use rust_decimal_macros::dec;

    #[test]
    fn test_overview_skips_absent_fields() {
        let mut state = DetailState::default();
        state.select("IBM");
        state.status = LoadState::Loaded;
        state.overview = Some(StockOverview {
            symbol: "IBM".to_string(),
            name: Some("International Business Machines".to_string()),
            pe_ratio: Some(dec!(22.5)),
            week_52_low: Some(dec!(100)),
            week_52_high: Some(dec!(200)),
            ..StockOverview::default()
        });
        state.quote = Some(Quote::new("IBM", dec!(150)));

        let mut out = String::new();
        DetailPanel::render(&mut out, &state);
        assert!(out.contains("International Business Machines"));
        assert!(out.contains("P/E"));
        assert!(!out.contains("Beta"));
        assert!(out.contains("50% of 52-week range"));
    }

    #[test]
    fn test_failure_message() {
        let mut state = DetailState::default();
        state.select("IBM");
        state.status = LoadState::Failed("Request timed out".to_string());

        let mut out = String::new();
        DetailPanel::render(&mut out, &state);
        assert!(out.contains("Could not load IBM: Request timed out"));
    }
}
