//! Local matching and result merging.

use super::{HybridSearchResult, ResultSource, SymbolMatch};
use crate::state::{Movers, Quote};
use std::collections::HashSet;

/// Gainers then losers whose symbol contains `query`, ignoring case.
///
/// A symbol listed twice keeps only its first occurrence.
pub fn local_matches(query: &str, movers: &Movers) -> Vec<HybridSearchResult> {
    let needle = query.trim().to_uppercase();
    if needle.is_empty() {
        return Vec::new();
    }

    let tagged = |list: &[Quote], source: ResultSource| {
        list.iter()
            .filter(|q| q.symbol.to_uppercase().contains(&needle))
            .map(|q| HybridSearchResult {
                symbol: q.symbol.clone(),
                name: q.symbol.clone(),
                price: Some(q.price),
                source,
            })
            .collect::<Vec<_>>()
    };

    let mut seen = HashSet::new();
    tagged(&movers.gainers, ResultSource::LocalGainer)
        .into_iter()
        .chain(tagged(&movers.losers, ResultSource::LocalLoser))
        .filter(|r| seen.insert(r.symbol.to_uppercase()))
        .collect()
}

/// Local matches first, then remote matches not already present locally.
///
/// Each side keeps its original order.
pub fn merge_results(
    local: Vec<HybridSearchResult>,
    remote: Vec<SymbolMatch>,
) -> Vec<HybridSearchResult> {
    let mut seen: HashSet<String> = local.iter().map(|r| r.symbol.to_uppercase()).collect();

    let remote = remote
        .into_iter()
        .filter(|m| seen.insert(m.symbol.to_uppercase()))
        .map(|m| HybridSearchResult {
            symbol: m.symbol,
            name: m.name,
            price: None,
            source: ResultSource::RemoteSearch,
        });

    local.into_iter().chain(remote).collect()
}
