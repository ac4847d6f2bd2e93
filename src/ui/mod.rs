//! Plain-text rendering.
//!
//! Each screen renders into a `String` that the app prints after every
//! processed input or action.

mod widgets;

pub use widgets::{
    DetailPanel, HelpPanel, MembershipPanel, MoversTable, SearchList, WatchlistPanel,
};

use crate::config::UiConfig;
use crate::search::SearchOrchestrator;
use crate::state::{Store, View};
use std::fmt::Write;

/// Main UI renderer.
pub struct Ui;

impl Ui {
    /// Render the current view.
    pub fn render(store: &Store, search: &SearchOrchestrator, config: &UiConfig) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "== {} ==", store.app.current_view);

        match store.app.current_view {
            View::Movers => MoversTable::render(
                &mut out,
                &store.movers,
                config.movers_rows,
                config.show_most_active,
            ),
            View::Search => SearchList::render(&mut out, search),
            View::Detail => DetailPanel::render(&mut out, &store.detail),
            View::Watchlists => WatchlistPanel::render(&mut out, &store.watchlists),
            View::Membership => MembershipPanel::render(&mut out, &store.watchlists),
            View::Help => HelpPanel::render(&mut out),
        }

        if let Some(notification) = &store.app.notification {
            widgets::render_notification(&mut out, notification);
        }

        if let Some(error) = &store.app.error {
            widgets::render_error(&mut out, error);
        }

        out
    }
}
