//! Debounced hybrid search state machine.

use super::{
    Debouncer, HybridSearchResult, StaleResultPolicy, SymbolMatch, SymbolSearch, local_matches,
    merge_results,
};
use crate::error::Result;
use crate::state::Movers;
use std::time::Duration;
use tokio::sync::mpsc;

/// Search lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchPhase {
    #[default]
    Idle,
    /// Waiting for the quiet period after the last keystroke.
    Debouncing,
    /// A remote search is in flight for the latest query.
    Searching,
}

/// Emitted by the debounce timer when a query should execute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTrigger {
    /// Input generation the trigger was armed for.
    pub generation: u64,
    pub query: String,
}

/// One executed search: its sequence number and the local matches computed
/// when it started. Hand it back to [`SearchOrchestrator::complete`] along
/// with the remote outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTicket {
    pub seq: u64,
    pub query: String,
    pub local: Vec<HybridSearchResult>,
}

/// Owns the query text, the debounce slot and the committed results.
///
/// Remote calls are never cancelled. Whether a superseded call may still
/// overwrite newer results is decided by [`StaleResultPolicy`].
#[derive(Debug)]
pub struct SearchOrchestrator {
    debouncer: Debouncer<SearchTrigger>,
    policy: StaleResultPolicy,
    query: String,
    generation: u64,
    latest_seq: u64,
    phase: SearchPhase,
    results: Vec<HybridSearchResult>,
}

impl SearchOrchestrator {
    /// Create an orchestrator whose debounce timer fires into `tx`.
    pub fn new(
        debounce: Duration,
        policy: StaleResultPolicy,
        tx: mpsc::UnboundedSender<SearchTrigger>,
    ) -> Self {
        Self {
            debouncer: Debouncer::new(debounce, tx),
            policy,
            query: String::new(),
            generation: 0,
            latest_seq: 0,
            phase: SearchPhase::Idle,
            results: Vec::new(),
        }
    }

    pub fn phase(&self) -> SearchPhase {
        self.phase
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn results(&self) -> &[HybridSearchResult] {
        &self.results
    }

    /// Handle new input text.
    ///
    /// Blank input clears results at once and issues nothing. Anything else
    /// (re)arms the debounce timer.
    pub fn on_input(&mut self, text: &str) {
        self.query = text.to_string();
        self.generation += 1;

        let trimmed = text.trim();
        if trimmed.is_empty() {
            self.clear_results();
            return;
        }

        self.debouncer.arm(SearchTrigger {
            generation: self.generation,
            query: trimmed.to_string(),
        });
        self.phase = SearchPhase::Debouncing;
    }

    /// Cancel any pending search and clear results.
    pub fn reset(&mut self) {
        self.on_input("");
    }

    /// Accept a fired debounce trigger.
    ///
    /// Returns `None` for triggers from an older input generation; those were
    /// already in the channel when newer input arrived.
    pub fn on_trigger(&mut self, trigger: SearchTrigger, movers: &Movers) -> Option<SearchTicket> {
        if trigger.generation != self.generation {
            tracing::debug!(query = %trigger.query, "ignoring superseded search trigger");
            return None;
        }
        if trigger.query.trim().is_empty() {
            self.clear_results();
            return None;
        }
        Some(self.begin(&trigger.query, movers))
    }

    /// Start a search now, computing local matches from `movers`.
    pub fn begin(&mut self, query: &str, movers: &Movers) -> SearchTicket {
        self.latest_seq += 1;
        self.phase = SearchPhase::Searching;

        let ticket = SearchTicket {
            seq: self.latest_seq,
            query: query.trim().to_string(),
            local: local_matches(query, movers),
        };
        tracing::debug!(seq = ticket.seq, query = %ticket.query, local = ticket.local.len(), "search started");
        ticket
    }

    /// Commit a finished search. Remote failures degrade to local matches.
    ///
    /// Returns whether the results were applied.
    pub fn complete(&mut self, ticket: SearchTicket, remote: Result<Vec<SymbolMatch>>) -> bool {
        let is_latest = ticket.seq == self.latest_seq;
        if !is_latest && self.policy == StaleResultPolicy::Discard {
            tracing::debug!(
                seq = ticket.seq,
                latest = self.latest_seq,
                "discarding stale search results"
            );
            return false;
        }

        let remote = remote.unwrap_or_else(|e| {
            tracing::warn!(query = %ticket.query, "symbol search failed, showing local matches only: {}", e);
            Vec::new()
        });

        self.results = merge_results(ticket.local, remote);
        if is_latest && self.phase == SearchPhase::Searching {
            self.phase = SearchPhase::Idle;
        }
        true
    }

    /// Drop results and supersede any search still in flight.
    fn clear_results(&mut self) {
        self.debouncer.clear();
        self.latest_seq += 1;
        self.results.clear();
        self.phase = SearchPhase::Idle;
    }

    /// Run a search to completion without debouncing.
    pub async fn search_now(
        &mut self,
        query: &str,
        movers: &Movers,
        searcher: &dyn SymbolSearch,
    ) -> &[HybridSearchResult] {
        self.query = query.to_string();
        self.generation += 1;
        self.debouncer.clear();

        if query.trim().is_empty() {
            self.clear_results();
            return &self.results;
        }

        let ticket = self.begin(query, movers);
        let remote = searcher.search_symbols(&ticket.query).await;
        self.complete(ticket, remote);
        &self.results
    }
}
