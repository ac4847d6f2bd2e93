//! Watchlist widgets.

use std::fmt::Write;

use super::{format_percentage, format_volume};
use crate::state::WatchlistState;

/// Watchlist overview widget.
pub struct WatchlistPanel;

impl WatchlistPanel {
    /// Render every list, and prices for the list whose prices were loaded.
    pub fn render(out: &mut String, state: &WatchlistState) {
        if state.lists.is_empty() {
            let _ = writeln!(out, "No watchlists yet. Create one with 'new <name>'.");
            return;
        }

        for list in &state.lists {
            let symbols = if list.stocks.is_empty() {
                "(empty)".to_string()
            } else {
                list.stocks.join(", ")
            };
            let _ = writeln!(out, "  {:<16} {}", list.name, symbols);
        }

        if let Some(name) = &state.priced_list {
            let _ = writeln!(out, "Prices for {name}");
            if state.prices.is_empty() {
                let _ = writeln!(out, "  (no symbols)");
            }
            for (symbol, quote) in &state.prices {
                match quote {
                    Some(q) => {
                        let _ = writeln!(
                            out,
                            "  {:<8} {:>10} {:>9} {:>8}",
                            symbol,
                            q.price.to_string(),
                            format_percentage(q.change_percentage),
                            format_volume(q.volume),
                        );
                    }
                    None => {
                        let _ = writeln!(out, "  {symbol:<8} {:>10}", "unavailable");
                    }
                }
            }
        }
    }
}

/// Membership selector for one symbol.
pub struct MembershipPanel;

impl MembershipPanel {
    pub fn render(out: &mut String, state: &WatchlistState) {
        let Some(symbol) = &state.membership_symbol else {
            return;
        };

        let _ = writeln!(out, "Watchlists for {symbol}");
        if state.membership.is_empty() {
            let _ = writeln!(out, "  No watchlists yet. Create one with 'new <name>'.");
            return;
        }
        for (name, member) in &state.membership {
            let mark = if *member { "x" } else { " " };
            let _ = writeln!(out, "  [{mark}] {name}");
        }
        let _ = writeln!(out, "Type 'toggle <list>' to add or remove {symbol}.");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Quote;
    use crate::watchlist::Watchlist;
    use rust_decimal_macros::dec;
    use std::collections::BTreeMap;

    #[test]
    fn test_lists_and_prices() {
        let state = WatchlistState {
            lists: vec![
                Watchlist {
                    name: "Tech".to_string(),
                    stocks: vec!["MSFT".to_string(), "AAPL".to_string()],
                },
                Watchlist::new("Energy"),
            ],
            priced_list: Some("Tech".to_string()),
            prices: vec![
                ("MSFT".to_string(), Some(Quote::new("MSFT", dec!(410.10)))),
                ("AAPL".to_string(), None),
            ],
            ..WatchlistState::default()
        };

        let mut out = String::new();
        WatchlistPanel::render(&mut out, &state);
        assert!(out.contains("MSFT, AAPL"));
        assert!(out.contains("(empty)"));
        assert!(out.contains("410.10"));
        assert!(out.contains("unavailable"));
    }

    #[test]
    fn test_membership_marks() {
        let state = WatchlistState {
            membership_symbol: Some("MSFT".to_string()),
            membership: BTreeMap::from([
                ("Energy".to_string(), false),
                ("Tech".to_string(), true),
            ]),
            ..WatchlistState::default()
        };

        let mut out = String::new();
        MembershipPanel::render(&mut out, &state);
        assert!(out.contains("[x] Tech"));
        assert!(out.contains("[ ] Energy"));
    }
}
