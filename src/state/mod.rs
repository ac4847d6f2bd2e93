//! State management for Moverwatch.
//!
//! This module provides centralized state management with a unidirectional
//! data flow pattern inspired by Redux/Elm architecture.

mod app_state;
mod detail_state;
mod movers_state;
mod watchlist_state;

pub use app_state::{AppState, View};
pub use detail_state::{DetailState, Interval, PricePoint, StockOverview};
pub use movers_state::{LoadState, MoverKind, Movers, MoversState, Quote};
pub use watchlist_state::WatchlistState;

use crate::error::Result;
use crate::search::{SearchTicket, SymbolMatch};
use crate::watchlist::Watchlist;
use std::collections::BTreeMap;
use tokio::sync::mpsc;

/// Actions that can be dispatched to modify state.
///
/// `Load*`, `Refresh*`, `SearchInput`, `CreateWatchlist`, `ToggleWatchlist`
/// and `ShowMembership` also trigger I/O in the app before being reduced.
#[derive(Debug)]
pub enum Action {
    // Navigation
    SetView(View),
    ShowHelp,

    // Movers
    LoadMovers,
    RefreshMovers,
    MoversLoaded(Movers),
    MoversFailed(String),

    // Search
    SearchInput(String),
    RemoteSearchCompleted(SearchTicket, Result<Vec<SymbolMatch>>),

    // Symbol detail
    LoadOverview(String),
    OverviewLoaded(StockOverview),
    LoadQuote(String),
    QuoteLoaded(Quote),
    LoadChart(String, Interval),
    ChartLoaded(String, Vec<PricePoint>),
    DetailFailed { symbol: String, message: String },

    // Watchlists
    LoadWatchlists,
    WatchlistsLoaded(Vec<Watchlist>),
    CreateWatchlist(String),
    ToggleWatchlist { list: String, symbol: String },
    ShowMembership(String),
    MembershipLoaded {
        symbol: String,
        membership: BTreeMap<String, bool>,
    },
    LoadWatchlistPrices(String),
    WatchlistPricesLoaded {
        list: String,
        prices: Vec<(String, Option<Quote>)>,
    },

    // Notifications and errors
    ShowNotification(Notification),
    DismissNotification,
    SetError(String),
    ClearError,

    // Quit
    Quit,
}

/// A one-shot message shown under the current screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub level: NotificationLevel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Success,
    Warning,
}

impl Notification {
    fn with_level(level: NotificationLevel, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level,
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::with_level(NotificationLevel::Info, message)
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::with_level(NotificationLevel::Success, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::with_level(NotificationLevel::Warning, message)
    }
}

/// The global state store.
#[derive(Debug)]
pub struct Store {
    /// Application state.
    pub app: AppState,
    /// Movers state.
    pub movers: MoversState,
    /// Symbol detail state.
    pub detail: DetailState,
    /// Watchlist state.
    pub watchlists: WatchlistState,
    /// Action sender for dispatching actions.
    action_tx: mpsc::UnboundedSender<Action>,
}

impl Store {
    /// Create a new store with the given action sender.
    pub fn new(action_tx: mpsc::UnboundedSender<Action>) -> Self {
        Self {
            app: AppState::new(),
            movers: MoversState::default(),
            detail: DetailState::default(),
            watchlists: WatchlistState::default(),
            action_tx,
        }
    }

    /// Dispatch an action to the store.
    pub fn dispatch(&self, action: Action) -> Result<()> {
        self.action_tx
            .send(action)
            .map_err(|e| crate::Error::channel(e.to_string()))
    }

    /// A sender for actions produced by background tasks.
    pub fn sender(&self) -> mpsc::UnboundedSender<Action> {
        self.action_tx.clone()
    }

    /// Apply an action to update state.
    pub fn reduce(&mut self, action: Action) {
        match action {
            // Navigation
            Action::SetView(view) => self.app.current_view = view,
            Action::ShowHelp => self.app.current_view = View::Help,

            // Movers
            Action::LoadMovers | Action::RefreshMovers => {
                self.movers.begin_load();
                self.app.current_view = View::Movers;
            }
            Action::MoversLoaded(movers) => self.movers.loaded(movers),
            Action::MoversFailed(message) => self.movers.failed(message),

            // Search results live in the orchestrator.
            Action::SearchInput(_) => self.app.current_view = View::Search,
            Action::RemoteSearchCompleted(..) => {}

            // Symbol detail
            Action::LoadOverview(symbol)
            | Action::LoadQuote(symbol)
            | Action::LoadChart(symbol, _) => {
                self.detail.select(&symbol);
                self.app.current_view = View::Detail;
            }
            Action::OverviewLoaded(overview) => {
                if self.detail.symbol.as_deref() == Some(overview.symbol.as_str()) {
                    self.detail.overview = Some(overview);
                    self.detail.status = LoadState::Loaded;
                }
            }
            Action::QuoteLoaded(quote) => {
                if self.detail.symbol.as_deref() == Some(quote.symbol.as_str()) {
                    self.detail.quote = Some(quote);
                    self.detail.status = LoadState::Loaded;
                }
            }
            Action::ChartLoaded(symbol, series) => {
                if self.detail.symbol.as_deref() == Some(symbol.as_str()) {
                    self.detail.status = if series.is_empty() {
                        LoadState::Empty
                    } else {
                        LoadState::Loaded
                    };
                    self.detail.series = series;
                }
            }
            Action::DetailFailed { symbol, message } => {
                if self.detail.symbol.as_deref() == Some(symbol.as_str()) {
                    self.detail.status = LoadState::Failed(message);
                }
            }

            // Watchlists
            Action::LoadWatchlists
            | Action::CreateWatchlist(_)
            | Action::ToggleWatchlist { .. }
            | Action::LoadWatchlistPrices(_) => {
                self.app.current_view = View::Watchlists;
            }
            Action::WatchlistsLoaded(lists) => self.watchlists.lists = lists,
            Action::ShowMembership(symbol) => {
                self.watchlists.membership_symbol = Some(symbol);
                self.app.current_view = View::Membership;
            }
            Action::MembershipLoaded { symbol, membership } => {
                self.watchlists.membership_symbol = Some(symbol);
                self.watchlists.membership = membership;
                self.app.current_view = View::Membership;
            }
            Action::WatchlistPricesLoaded { list, prices } => {
                self.watchlists.priced_list = Some(list);
                self.watchlists.prices = prices;
            }

            // Notifications and errors
            Action::ShowNotification(notification) => {
                self.app.notification = Some(notification);
            }
            Action::DismissNotification => self.app.notification = None,
            Action::SetError(error) => self.app.error = Some(error),
            Action::ClearError => self.app.error = None,

            // Quit
            Action::Quit => self.app.should_quit = true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn store() -> Store {
        let (tx, _rx) = mpsc::unbounded_channel();
        Store::new(tx)
    }

    #[test]
    fn test_movers_lifecycle() {
        let mut store = store();
        store.reduce(Action::LoadMovers);
        assert!(store.movers.status.is_loading());

        store.reduce(Action::MoversFailed("Thank you for using Alpha Vantage!".to_string()));
        assert_eq!(
            store.movers.status.error(),
            Some("Thank you for using Alpha Vantage!")
        );

        store.reduce(Action::RefreshMovers);
        store.reduce(Action::MoversLoaded(Movers {
            gainers: vec![Quote::new("AAPL", dec!(190.00))],
            ..Movers::default()
        }));
        assert_eq!(store.movers.status, LoadState::Loaded);
        assert!(store.movers.last_updated.is_some());
    }

    #[test]
    fn test_chart_for_other_symbol_is_ignored() {
        let mut store = store();
        store.reduce(Action::LoadChart("AAPL".to_string(), Interval::Min5));
        store.reduce(Action::LoadOverview("MSFT".to_string()));
        store.reduce(Action::ChartLoaded("AAPL".to_string(), Vec::new()));

        assert_eq!(store.detail.symbol.as_deref(), Some("MSFT"));
        assert!(store.detail.status.is_loading());
    }

    #[test]
    fn test_late_quote_for_previous_symbol_is_ignored() {
        let mut store = store();
        store.reduce(Action::LoadQuote("AAPL".to_string()));
        store.reduce(Action::LoadQuote("MSFT".to_string()));
        store.reduce(Action::QuoteLoaded(Quote::new("AAPL", dec!(190.00))));
        assert!(store.detail.quote.is_none());

        store.reduce(Action::QuoteLoaded(Quote::new("MSFT", dec!(410.10))));
        assert_eq!(store.detail.status, LoadState::Loaded);
    }

    #[test]
    fn test_late_failure_for_previous_symbol_is_ignored() {
        let mut store = store();
        store.reduce(Action::LoadOverview("AAPL".to_string()));
        store.reduce(Action::LoadOverview("MSFT".to_string()));
        store.reduce(Action::DetailFailed {
            symbol: "AAPL".to_string(),
            message: "no overview data for AAPL".to_string(),
        });
        assert_eq!(store.detail.symbol.as_deref(), Some("MSFT"));
        assert!(store.detail.status.is_loading());

        store.reduce(Action::DetailFailed {
            symbol: "MSFT".to_string(),
            message: "Request timed out".to_string(),
        });
        assert_eq!(store.detail.status.error(), Some("Request timed out"));
    }

    #[test]
    fn test_membership_opens_selector() {
        let mut store = store();
        let membership = BTreeMap::from([("Tech".to_string(), true)]);
        store.reduce(Action::MembershipLoaded {
            symbol: "MSFT".to_string(),
            membership: membership.clone(),
        });
        assert_eq!(store.app.current_view, View::Membership);
        assert_eq!(store.watchlists.membership, membership);
    }

    #[test]
    fn test_dispatch_fails_when_receiver_dropped() {
        let store = store();
        assert!(store.dispatch(Action::Quit).is_err());
    }

    #[test]
    fn test_quit() {
        let mut store = store();
        store.reduce(Action::Quit);
        assert!(store.app.should_quit);
    }
}
