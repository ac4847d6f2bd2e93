//! Hybrid symbol search.
//!
//! Combines the locally held movers lists with the provider's symbol search.
//! Typing is debounced through a single-slot timer; each executed search is
//! tagged with a sequence number so late remote answers can be recognised.

mod debounce;
mod merge;
mod orchestrator;

pub use debounce::Debouncer;
pub use merge::{local_matches, merge_results};
pub use orchestrator::{SearchOrchestrator, SearchPhase, SearchTicket, SearchTrigger};

use crate::error::Result;
use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A provider symbol search hit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolMatch {
    pub symbol: String,
    pub name: String,
    /// Security type, e.g. `Equity` or `ETF`.
    pub kind: Option<String>,
    pub region: Option<String>,
    pub currency: Option<String>,
}

/// Where a hybrid search result came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResultSource {
    LocalGainer,
    LocalLoser,
    RemoteSearch,
}

impl std::fmt::Display for ResultSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::LocalGainer => write!(f, "gainer"),
            Self::LocalLoser => write!(f, "loser"),
            Self::RemoteSearch => write!(f, "search"),
        }
    }
}

/// One row of the combined search result list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HybridSearchResult {
    pub symbol: String,
    pub name: String,
    /// Known only for local matches.
    pub price: Option<Decimal>,
    pub source: ResultSource,
}

/// What to do with a remote result whose search has been superseded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StaleResultPolicy {
    /// Drop results from any search that is not the latest one issued.
    #[default]
    Discard,
    /// Apply results whenever they arrive, even over a newer query's results.
    Apply,
}

/// Remote symbol search used by the orchestrator.
#[async_trait]
pub trait SymbolSearch: Send + Sync {
    async fn search_symbols(&self, keywords: &str) -> Result<Vec<SymbolMatch>>;
}
