//! Market mover state.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A price quote for one symbol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    /// Ticker symbol.
    pub symbol: String,
    /// Last traded price.
    pub price: Decimal,
    /// Absolute change for the session.
    pub change_amount: Option<Decimal>,
    /// Percentage change for the session (`5.25` means 5.25%).
    pub change_percentage: Option<Decimal>,
    /// Traded volume.
    pub volume: Option<u64>,
}

impl Quote {
    pub fn new(symbol: impl Into<String>, price: Decimal) -> Self {
        Self {
            symbol: symbol.into(),
            price,
            change_amount: None,
            change_percentage: None,
            volume: None,
        }
    }

    /// Whether the quote moved up (or was flat) this session.
    pub fn is_up(&self) -> bool {
        self.change_amount
            .or(self.change_percentage)
            .is_none_or(|c| c >= Decimal::ZERO)
    }
}

/// Which movers list a quote belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoverKind {
    Gainer,
    Loser,
    MostActive,
}

impl std::fmt::Display for MoverKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Gainer => write!(f, "gainer"),
            Self::Loser => write!(f, "loser"),
            Self::MostActive => write!(f, "most active"),
        }
    }
}

/// The session's top gainers, losers and most actively traded symbols.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Movers {
    pub gainers: Vec<Quote>,
    pub losers: Vec<Quote>,
    pub most_active: Vec<Quote>,
    /// Provider's own timestamp string, passed through untouched.
    pub last_updated: Option<String>,
}

impl Movers {
    /// True when every list is empty.
    pub fn is_empty(&self) -> bool {
        self.gainers.is_empty() && self.losers.is_empty() && self.most_active.is_empty()
    }

    pub fn list(&self, kind: MoverKind) -> &[Quote] {
        match kind {
            MoverKind::Gainer => &self.gainers,
            MoverKind::Loser => &self.losers,
            MoverKind::MostActive => &self.most_active,
        }
    }
}

/// Status of a primary fetch as the user sees it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LoadState {
    #[default]
    Idle,
    Loading,
    Loaded,
    /// Fetch succeeded but yielded nothing to show.
    Empty,
    /// Fetch failed; holds the message shown next to the retry action.
    Failed(String),
}

impl LoadState {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failed(message) => Some(message),
            _ => None,
        }
    }
}

/// State for the movers screen.
#[derive(Debug, Default)]
pub struct MoversState {
    /// Last successfully loaded movers.
    pub movers: Movers,
    /// Current load status.
    pub status: LoadState,
    /// When movers were last loaded.
    pub last_updated: Option<DateTime<Utc>>,
}

impl MoversState {
    pub fn begin_load(&mut self) {
        self.status = LoadState::Loading;
    }

    pub fn loaded(&mut self, movers: Movers) {
        self.status = if movers.is_empty() {
            LoadState::Empty
        } else {
            LoadState::Loaded
        };
        self.movers = movers;
        self.last_updated = Some(Utc::now());
    }

    /// Record a failure. Previously loaded movers stay available for search.
    pub fn failed(&mut self, message: impl Into<String>) {
        self.status = LoadState::Failed(message.into());
    }
}
