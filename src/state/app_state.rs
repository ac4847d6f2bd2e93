//! Application-level state.

use super::Notification;

/// The current view/screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Movers,
    Search,
    Detail,
    Watchlists,
    Membership,
    Help,
}

impl std::fmt::Display for View {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Movers => write!(f, "Movers"),
            Self::Search => write!(f, "Search"),
            Self::Detail => write!(f, "Detail"),
            Self::Watchlists => write!(f, "Watchlists"),
            Self::Membership => write!(f, "Add to watchlist"),
            Self::Help => write!(f, "Help"),
        }
    }
}

/// Global application state.
#[derive(Debug, Default)]
pub struct AppState {
    /// Current view.
    pub current_view: View,
    /// Current notification.
    pub notification: Option<Notification>,
    /// Current error message not tied to a specific screen.
    pub error: Option<String>,
    /// Whether the app should quit.
    pub should_quit: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the pending notification, if any.
    pub fn take_notification(&mut self) -> Option<Notification> {
        self.notification.take()
    }
}
