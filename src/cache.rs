//! In-memory response cache.
//!
//! Keyed by operation kind and symbol. Successful fetches are stored and
//! served without touching the network until they expire or are evicted;
//! failed fetches are never stored. Entries expire after a configurable TTL
//! and the least recently used entry is evicted once capacity is reached.

use crate::config::CacheConfig;
use crate::error::Result;
use crate::state::Interval;
use std::collections::HashMap;
use std::future::Future;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

/// Provider operation a cached value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuoteKind {
    Movers,
    SymbolSearch,
    Overview,
    GlobalQuote,
    Intraday(Interval),
}

/// Deterministic cache key for `(operation, symbol)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub kind: QuoteKind,
    pub symbol: String,
}

impl CacheKey {
    /// Key for a per-symbol operation. Symbols are case-insensitive.
    pub fn new(kind: QuoteKind, symbol: &str) -> Self {
        Self {
            kind,
            symbol: symbol.trim().to_uppercase(),
        }
    }

    /// Key for a symbol search. Keywords are trimmed and lower-cased.
    pub fn search(keywords: &str) -> Self {
        Self {
            kind: QuoteKind::SymbolSearch,
            symbol: keywords.trim().to_lowercase(),
        }
    }

    /// Key for the session movers lists.
    pub fn movers() -> Self {
        Self {
            kind: QuoteKind::Movers,
            symbol: String::new(),
        }
    }
}

#[derive(Debug)]
struct Entry<V> {
    value: V,
    stored_at: Instant,
    last_used: u64,
}

#[derive(Debug)]
struct Inner<V> {
    entries: HashMap<CacheKey, Entry<V>>,
    clock: u64,
}

impl<V> Inner<V> {
    fn tick(&mut self) -> u64 {
        self.clock += 1;
        self.clock
    }
}

/// Bounded, expiring response cache.
#[derive(Debug)]
pub struct ResponseCache<V> {
    inner: Mutex<Inner<V>>,
    ttl: Option<Duration>,
    capacity: usize,
}

impl<V: Clone> ResponseCache<V> {
    /// Create a cache. `ttl: None` keeps entries until evicted.
    pub fn new(ttl: Option<Duration>, capacity: usize) -> Self {
        Self {
            inner: Mutex::new(Inner {
                entries: HashMap::new(),
                clock: 0,
            }),
            ttl,
            capacity: capacity.max(1),
        }
    }

    pub fn from_config(config: &CacheConfig) -> Self {
        Self::new(config.ttl(), config.max_entries)
    }

    /// Return the cached value for `key`, or run `fetch` and cache its success.
    ///
    /// The lock is not held while `fetch` runs, so two concurrent misses on
    /// the same key may both fetch; the later result wins.
    pub async fn get_or_fetch<F, Fut>(&self, key: CacheKey, fetch: F) -> Result<V>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V>>,
    {
        if let Some(value) = self.get(&key).await {
            tracing::debug!(?key, "cache hit");
            return Ok(value);
        }

        tracing::debug!(?key, "cache miss");
        let value = fetch().await?;
        self.insert(key, value.clone()).await;
        Ok(value)
    }

    /// Look up a live entry, refreshing its recency.
    pub async fn get(&self, key: &CacheKey) -> Option<V> {
        let mut inner = self.inner.lock().await;
        let expired = inner
            .entries
            .get(key)
            .is_some_and(|entry| self.is_expired(entry));
        if expired {
            inner.entries.remove(key);
            return None;
        }

        let now = inner.tick();
        inner.entries.get_mut(key).map(|entry| {
            entry.last_used = now;
            entry.value.clone()
        })
    }

    /// Store a value, evicting the least recently used entry when full.
    pub async fn insert(&self, key: CacheKey, value: V) {
        let mut inner = self.inner.lock().await;

        if !inner.entries.contains_key(&key) && inner.entries.len() >= self.capacity {
            let ttl = self.ttl;
            inner
                .entries
                .retain(|_, entry| ttl.is_none_or(|ttl| entry.stored_at.elapsed() < ttl));

            let oldest = inner
                .entries
                .iter()
                .min_by_key(|(_, entry)| entry.last_used)
                .map(|(key, _)| key.clone());
            if inner.entries.len() >= self.capacity
                && let Some(oldest) = oldest
            {
                tracing::debug!(key = ?oldest, "evicting cache entry");
                inner.entries.remove(&oldest);
            }
        }

        let now = inner.tick();
        inner.entries.insert(
            key,
            Entry {
                value,
                stored_at: Instant::now(),
                last_used: now,
            },
        );
    }

    /// Drop one entry so the next lookup goes to the network.
    pub async fn invalidate(&self, key: &CacheKey) -> bool {
        self.inner.lock().await.entries.remove(key).is_some()
    }

    pub async fn clear(&self) {
        self.inner.lock().await.entries.clear();
    }

    /// Number of stored entries, including any not yet swept after expiring.
    pub async fn len(&self) -> usize {
        self.inner.lock().await.entries.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    fn is_expired(&self, entry: &Entry<V>) -> bool {
        self.ttl.is_some_and(|ttl| entry.stored_at.elapsed() >= ttl)
    }
}
