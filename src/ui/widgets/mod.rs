//! Plain-text widgets.

mod detail_panel;
mod help;
mod movers_table;
mod notifications;
mod search_list;
mod watchlist_panel;

pub use detail_panel::DetailPanel;
pub use help::HelpPanel;
pub use movers_table::MoversTable;
pub use notifications::{render_error, render_notification};
pub use search_list::SearchList;
pub use watchlist_panel::{MembershipPanel, WatchlistPanel};

use rust_decimal::Decimal;

/// Truncate a string to a maximum length with ellipsis.
pub(crate) fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}

/// Signed change with two decimals, e.g. `+1.25` or `-0.40`.
pub(crate) fn format_change(change: Option<Decimal>) -> String {
    match change {
        Some(c) if c >= Decimal::ZERO => format!("+{:.2}", c),
        Some(c) => format!("{:.2}", c),
        None => "-".to_string(),
    }
}

/// Signed percentage, e.g. `+5.25%`.
pub(crate) fn format_percentage(pct: Option<Decimal>) -> String {
    match pct {
        Some(_) => format!("{}%", format_change(pct)),
        None => "-".to_string(),
    }
}

/// Compact volume, e.g. `1.2M`.
pub(crate) fn format_volume(volume: Option<u64>) -> String {
    match volume {
        Some(v) if v >= 1_000_000_000 => format!("{:.1}B", v as f64 / 1e9),
        Some(v) if v >= 1_000_000 => format!("{:.1}M", v as f64 / 1e6),
        Some(v) if v >= 1_000 => format!("{:.1}K", v as f64 / 1e3),
        Some(v) => v.to_string(),
        None => "-".to_string(),
    }
}
