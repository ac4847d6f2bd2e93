//! Watchlist screen state.

use super::Quote;
use crate::watchlist::Watchlist;
use std::collections::BTreeMap;

/// Snapshot of persisted watchlists plus per-screen selections.
#[derive(Debug, Default)]
pub struct WatchlistState {
    /// Lists as last read from storage.
    pub lists: Vec<Watchlist>,
    /// Symbol the membership selector is open for.
    pub membership_symbol: Option<String>,
    /// List name to membership of `membership_symbol`.
    pub membership: BTreeMap<String, bool>,
    /// Latest quotes for the list whose prices were requested.
    pub prices: Vec<(String, Option<Quote>)>,
    /// List whose prices are shown.
    pub priced_list: Option<String>,
}

impl WatchlistState {
    pub fn find(&self, name: &str) -> Option<&Watchlist> {
        self.lists.iter().find(|w| w.name == name)
    }

    /// Symbols in the named list, empty if the list is unknown.
    pub fn symbols(&self, name: &str) -> Vec<String> {
        self.find(name).map(|w| w.stocks.clone()).unwrap_or_default()
    }
}
