//! Movers table widget.

use std::fmt::Write;

use super::{format_change, format_percentage, format_volume};
use crate::state::{LoadState, MoverKind, MoversState, Quote};

/// Movers table widget.
pub struct MoversTable;

impl MoversTable {
    /// Render the movers screen.
    pub fn render(out: &mut String, state: &MoversState, rows: usize, show_most_active: bool) {
        match &state.status {
            LoadState::Idle => {
                let _ = writeln!(out, "No movers loaded yet. Type 'movers' to load them.");
            }
            LoadState::Loading => {
                let _ = writeln!(out, "Loading market movers...");
            }
            LoadState::Empty => {
                let _ = writeln!(out, "No market movers available right now.");
                let _ = writeln!(out, "Type 'retry' to check again.");
            }
            LoadState::Failed(message) => {
                let _ = writeln!(out, "Could not load market movers: {message}");
                let _ = writeln!(out, "Type 'retry' to try again.");
            }
            LoadState::Loaded => {
                Self::render_list(out, "Top gainers", state.movers.list(MoverKind::Gainer), rows);
                Self::render_list(out, "Top losers", state.movers.list(MoverKind::Loser), rows);
                if show_most_active {
                    Self::render_list(
                        out,
                        "Most active",
                        state.movers.list(MoverKind::MostActive),
                        rows,
                    );
                }
                if let Some(updated) = &state.movers.last_updated {
                    let _ = writeln!(out, "Last updated: {updated}");
                }
            }
        }
    }

    fn render_list(out: &mut String, title: &str, quotes: &[Quote], rows: usize) {
        let _ = writeln!(out, "{title}");
        if quotes.is_empty() {
            let _ = writeln!(out, "  (none)");
            return;
        }

        let _ = writeln!(
            out,
            "  {:<8} {:>10} {:>9} {:>9} {:>8}",
            "Symbol", "Price", "Change", "Change%", "Volume"
        );
        for quote in quotes.iter().take(rows) {
            let _ = writeln!(
                out,
                "  {:<8} {:>10} {:>9} {:>9} {:>8}",
                quote.symbol,
                quote.price.to_string(),
                format_change(quote.change_amount),
                format_percentage(quote.change_percentage),
                format_volume(quote.volume),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Movers;
    use rust_decimal_macros::dec;

    fn render(state: &MoversState) -> String {
        let mut out = String::new();
        MoversTable::render(&mut out, state, 10, false);
        out
    }

    #[test]
    fn test_empty_and_failed_are_distinct() {
        let mut state = MoversState::default();
        state.loaded(Movers::default());
        let empty = render(&state);
        assert!(empty.contains("No market movers available"));

        state.failed("Thank you for using Alpha Vantage!");
        let failed = render(&state);
        assert!(failed.contains("Could not load market movers: Thank you for using Alpha Vantage!"));
        assert!(failed.contains("retry"));
        assert_ne!(empty, failed);
    }

    #[test]
    fn test_loaded_lists_keep_price_scale() {
        let mut quote = Quote::new("AAPL", dec!(190.00));
        quote.change_percentage = Some(dec!(5.25));
        let mut state = MoversState::default();
        state.loaded(Movers {
            gainers: vec![quote],
            ..Movers::default()
        });

        let out = render(&state);
        assert!(out.contains("Top gainers"));
        assert!(out.contains("190.00"));
        assert!(out.contains("+5.25%"));
        assert!(!out.contains("Most active"));
    }
}
