//! User watchlists.
//!
//! The whole collection lives under a single storage key. Every mutation
//! reads the collection, changes it in memory, and writes it back before
//! returning; a failed write is returned to the caller as-is.

mod storage;

pub use storage::{FileStorage, MemoryStorage, Storage};

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Storage key holding the serialized watchlist collection.
pub const WATCHLISTS_KEY: &str = "watchlists";

/// A named set of symbols, kept in insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Watchlist {
    pub name: String,
    #[serde(default)]
    pub stocks: Vec<String>,
}

impl Watchlist {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            stocks: Vec::new(),
        }
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.stocks.iter().any(|s| s == symbol)
    }

    /// Add `symbol` if absent, remove it if present. Returns the new membership.
    fn toggle(&mut self, symbol: &str) -> bool {
        if let Some(index) = self.stocks.iter().position(|s| s == symbol) {
            self.stocks.remove(index);
            false
        } else {
            self.stocks.push(symbol.to_string());
            true
        }
    }
}

/// Persisted watchlist collection.
#[derive(Clone)]
pub struct WatchlistStore {
    storage: Arc<dyn Storage>,
    key: String,
}

impl WatchlistStore {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self {
            storage,
            key: WATCHLISTS_KEY.to_string(),
        }
    }

    /// Every watchlist, in creation order.
    pub async fn list_all(&self) -> Result<Vec<Watchlist>> {
        match self.storage.get_item(&self.key).await? {
            None => Ok(Vec::new()),
            Some(blob) if blob.trim().is_empty() => Ok(Vec::new()),
            Some(blob) => serde_json::from_str(&blob)
                .map_err(|e| Error::persistence(format!("stored watchlists are corrupted: {e}"))),
        }
    }

    /// Look up one watchlist by name.
    pub async fn watchlist(&self, name: &str) -> Result<Option<Watchlist>> {
        let name = name.trim();
        Ok(self.list_all().await?.into_iter().find(|w| w.name == name))
    }

    /// Create an empty watchlist.
    ///
    /// Blank or already used names are a no-op. Returns whether a list was created.
    pub async fn create(&self, name: &str) -> Result<bool> {
        let name = name.trim();
        if name.is_empty() {
            return Ok(false);
        }

        let mut lists = self.list_all().await?;
        if lists.iter().any(|w| w.name == name) {
            tracing::debug!(name, "watchlist already exists");
            return Ok(false);
        }

        lists.push(Watchlist::new(name));
        self.save(&lists).await?;
        tracing::info!(name, "watchlist created");
        Ok(true)
    }

    /// Add `symbol` to `list_name` if absent, otherwise remove it.
    ///
    /// Returns the new membership, or `None` without writing anything when
    /// the list does not exist or the symbol is blank.
    pub async fn toggle_membership(&self, list_name: &str, symbol: &str) -> Result<Option<bool>> {
        let symbol = symbol.trim().to_uppercase();
        if symbol.is_empty() {
            return Ok(None);
        }

        let list_name = list_name.trim();
        let mut lists = self.list_all().await?;
        let Some(list) = lists.iter_mut().find(|w| w.name == list_name) else {
            tracing::debug!(list = list_name, "toggle on unknown watchlist ignored");
            return Ok(None);
        };

        let member = list.toggle(&symbol);
        self.save(&lists).await?;
        tracing::info!(list = list_name, symbol = %symbol, member, "watchlist membership toggled");
        Ok(Some(member))
    }

    /// For every list, whether it contains `symbol`.
    pub async fn membership_of(&self, symbol: &str) -> Result<BTreeMap<String, bool>> {
        let symbol = symbol.trim().to_uppercase();
        Ok(self
            .list_all()
            .await?
            .into_iter()
            .map(|w| {
                let member = w.contains(&symbol);
                (w.name, member)
            })
            .collect())
    }

    async fn save(&self, lists: &[Watchlist]) -> Result<()> {
        let blob = serde_json::to_string(lists)?;
        self.storage.set_item(&self.key, &blob).await
    }
}

#[cfg(test)]
mod tests {
    use super::storage::MockStorage;
    use super::*;
    use pretty_assertions::assert_eq;

    fn store() -> WatchlistStore {
        WatchlistStore::new(Arc::new(MemoryStorage::new()))
    }

    #[tokio::test]
    async fn test_create_appends_empty_list() {
        let store = store();
        assert!(store.create("Tech").await.unwrap());
        assert!(store.create("Energy").await.unwrap());

        let lists = store.list_all().await.unwrap();
        assert_eq!(lists, vec![Watchlist::new("Tech"), Watchlist::new("Energy")]);
    }

    #[tokio::test]
    async fn test_create_existing_or_blank_is_noop() {
        let store = store();
        store.create("Tech").await.unwrap();
        store.toggle_membership("Tech", "MSFT").await.unwrap();
        let before = store.list_all().await.unwrap();

        assert!(!store.create("Tech").await.unwrap());
        assert!(!store.create("  Tech ").await.unwrap());
        assert!(!store.create("   ").await.unwrap());
        assert_eq!(store.list_all().await.unwrap(), before);
    }

    #[tokio::test]
    async fn test_toggle_twice_restores_membership() {
        let store = store();
        store.create("Tech").await.unwrap();
        store.toggle_membership("Tech", "AAPL").await.unwrap();
        let before = store.list_all().await.unwrap();

        assert_eq!(store.toggle_membership("Tech", "MSFT").await.unwrap(), Some(true));
        assert_eq!(store.toggle_membership("Tech", "MSFT").await.unwrap(), Some(false));
        assert_eq!(store.list_all().await.unwrap(), before);
    }

    #[tokio::test]
    async fn test_symbol_appears_once_in_insertion_order() {
        let store = store();
        store.create("Tech").await.unwrap();
        for symbol in ["MSFT", "aapl", "NVDA"] {
            store.toggle_membership("Tech", symbol).await.unwrap();
        }
        let list = store.watchlist("Tech").await.unwrap().unwrap();
        assert_eq!(list.stocks, vec!["MSFT", "AAPL", "NVDA"]);
        assert_eq!(store.toggle_membership("Tech", "AAPL").await.unwrap(), Some(false));
    }

    #[tokio::test]
    async fn test_toggle_on_missing_list_is_noop() {
        let store = store();
        store.create("Energy").await.unwrap();
        let before = store.list_all().await.unwrap();

        assert_eq!(store.toggle_membership("Tech", "MSFT").await.unwrap(), None);
        assert_eq!(store.list_all().await.unwrap(), before);
    }

    #[tokio::test]
    async fn test_membership_of() {
        let store = store();
        store.create("Tech").await.unwrap();
        store.create("Energy").await.unwrap();
        store.toggle_membership("Tech", "MSFT").await.unwrap();

        let membership = store.membership_of("msft").await.unwrap();
        assert_eq!(membership.get("Tech"), Some(&true));
        assert_eq!(membership.get("Energy"), Some(&false));
    }

    #[tokio::test]
    async fn test_persisted_format_is_flat_list() {
        let storage = Arc::new(MemoryStorage::new());
        let store = WatchlistStore::new(storage.clone());
        store.create("Tech").await.unwrap();
        store.toggle_membership("Tech", "MSFT").await.unwrap();

        let blob = storage.get_item(WATCHLISTS_KEY).await.unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_str(&blob).unwrap();
        assert_eq!(value, serde_json::json!([{ "name": "Tech", "stocks": ["MSFT"] }]));
    }

    #[tokio::test]
    async fn test_write_failure_propagates() {
        let mut storage = MockStorage::new();
        storage.expect_get_item().returning(|_| Ok(None));
        storage
            .expect_set_item()
            .times(1)
            .returning(|_, _| Err(Error::persistence("disk full")));

        let store = WatchlistStore::new(Arc::new(storage));
        let err = store.create("Tech").await.unwrap_err();
        assert!(matches!(err, Error::Persistence(m) if m == "disk full"));
    }

    #[tokio::test]
    async fn test_corrupted_blob_is_persistence_error() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set_item(WATCHLISTS_KEY, "{oops").await.unwrap();

        let store = WatchlistStore::new(storage);
        assert!(matches!(
            store.list_all().await,
            Err(Error::Persistence(_))
        ));
    }
}
