//! Search results widget.

use std::fmt::Write;

use super::truncate_string;
use crate::search::{SearchOrchestrator, SearchPhase};

/// Search results widget.
pub struct SearchList;

impl SearchList {
    /// Render the hybrid search results.
    pub fn render(out: &mut String, search: &SearchOrchestrator) {
        let query = search.query().trim();
        if query.is_empty() {
            let _ = writeln!(out, "Type '/<text>' to search symbols.");
            return;
        }

        let status = match search.phase() {
            SearchPhase::Idle => "",
            SearchPhase::Debouncing | SearchPhase::Searching => " (searching...)",
        };
        let _ = writeln!(out, "Results for '{query}'{status}");

        let results = search.results();
        if results.is_empty() {
            if search.phase() == SearchPhase::Idle {
                let _ = writeln!(out, "  No matches.");
            }
            return;
        }

        for result in results {
            let price = result
                .price
                .map(|p| p.to_string())
                .unwrap_or_default();
            let _ = writeln!(
                out,
                "  {:<8} {:<32} {:>10}  [{}]",
                result.symbol,
                truncate_string(&result.name, 32),
                price,
                result.source,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::StaleResultPolicy;
    use std::time::Duration;
    use tokio::sync::mpsc;

    #[tokio::test]
    async fn test_blank_query_shows_hint() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let search = SearchOrchestrator::new(Duration::from_millis(300), StaleResultPolicy::Discard, tx);

        let mut out = String::new();
        SearchList::render(&mut out, &search);
        assert!(out.contains("to search symbols"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_pending_query_shows_searching() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut search =
            SearchOrchestrator::new(Duration::from_millis(300), StaleResultPolicy::Discard, tx);
        search.on_input("AP");

        let mut out = String::new();
        SearchList::render(&mut out, &search);
        assert!(out.contains("Results for 'AP' (searching...)"));
        assert!(!out.contains("No matches"));
    }
}
