//! Configuration settings for Moverwatch.

use crate::error::{Error, Result};
use crate::search::StaleResultPolicy;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable consulted when no API key is configured.
pub const API_KEY_ENV: &str = "ALPHAVANTAGE_API_KEY";

/// Values shipped in sample configs that are not real keys.
const PLACEHOLDER_KEYS: &[&str] = &["demo", "your_api_key_here", "YOUR_API_KEY", "changeme"];

/// Main configuration struct.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// API configuration.
    pub api: ApiConfig,
    /// Hybrid search configuration.
    pub search: SearchConfig,
    /// Response cache configuration.
    pub cache: CacheConfig,
    /// Watchlist storage configuration.
    pub storage: StorageConfig,
    /// UI configuration.
    pub ui: UiConfig,
}

impl Config {
    /// Load configuration from the default location, falling back to defaults.
    pub fn load_or_default() -> Result<Self> {
        Self::load(None)
    }

    /// Load configuration from file and `MOVERWATCH_*` environment variables.
    ///
    /// A missing file is not an error. The API key falls back to
    /// [`API_KEY_ENV`] when neither source provides one.
    pub fn load(path: Option<PathBuf>) -> Result<Self> {
        let config_path = path.unwrap_or_else(default_config_path);

        let layered = ::config::Config::builder()
            .add_source(::config::File::from(config_path.as_path()).required(false))
            .add_source(
                ::config::Environment::with_prefix("MOVERWATCH")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| Error::config(e.to_string()))?;

        let mut config: Self = layered
            .try_deserialize()
            .map_err(|e| Error::config(e.to_string()))?;

        if config.api.api_key.is_none() {
            config.api.api_key = std::env::var(API_KEY_ENV).ok();
        }

        Ok(config)
    }

    /// Save configuration to file.
    pub fn save(&self, path: Option<PathBuf>) -> Result<()> {
        let config_path = path.unwrap_or_else(default_config_path);

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self).map_err(|e| Error::config(e.to_string()))?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }
}

fn default_config_path() -> PathBuf {
    super::config_dir()
        .map(|p| p.join("config.toml"))
        .unwrap_or_else(|_| PathBuf::from("config.toml"))
}

/// API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Quote provider query endpoint.
    pub base_url: String,
    /// Provider API key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Per-attempt request timeout in milliseconds.
    pub timeout_ms: u64,
    /// Total attempts for a request that fails transiently.
    pub max_attempts: u32,
    /// Linear backoff unit in milliseconds; attempt `n` waits `n * base`.
    pub retry_base_delay_ms: u64,
}

impl ApiConfig {
    /// The configured API key, or a configuration error if it is unusable.
    pub fn api_key(&self) -> Result<&str> {
        match self.api_key.as_deref().map(str::trim) {
            None | Some("") => Err(Error::config(format!(
                "no API key configured; set {API_KEY_ENV}"
            ))),
            Some(key) if PLACEHOLDER_KEYS.contains(&key) => Err(Error::config(format!(
                "API key is a placeholder ({key}); set {API_KEY_ENV}"
            ))),
            Some(key) => Ok(key),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn retry_base_delay(&self) -> Duration {
        Duration::from_millis(self.retry_base_delay_ms)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.alphavantage.co/query".to_string(),
            api_key: None,
            timeout_ms: 10_000,
            max_attempts: 3,
            retry_base_delay_ms: 1_000,
        }
    }
}

/// Hybrid search configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Quiet period before a typed query executes, in milliseconds.
    pub debounce_ms: u64,
    /// What to do with a remote result that arrives after a newer query started.
    pub stale_results: StaleResultPolicy,
}

impl SearchConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 300,
            stale_results: StaleResultPolicy::Discard,
        }
    }
}

/// Response cache configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Entry lifetime in seconds (0 keeps entries for the whole session).
    pub ttl_secs: u64,
    /// Maximum number of cached responses.
    pub max_entries: usize,
}

impl CacheConfig {
    pub fn ttl(&self) -> Option<Duration> {
        (self.ttl_secs > 0).then(|| Duration::from_secs(self.ttl_secs))
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: 300,
            max_entries: 256,
        }
    }
}

/// Watchlist storage configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Storage file path. Defaults to `storage.json` in the data directory.
    pub path: Option<PathBuf>,
}

impl StorageConfig {
    /// Resolve the storage file path.
    pub fn resolve_path(&self) -> PathBuf {
        self.path.clone().unwrap_or_else(|| {
            super::data_dir()
                .map(|p| p.join("storage.json"))
                .unwrap_or_else(|_| Path::new("storage.json").to_path_buf())
        })
    }
}

/// UI configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Rows shown per movers list.
    pub movers_rows: usize,
    /// Show the most actively traded list alongside gainers and losers.
    pub show_most_active: bool,
    /// Load movers on startup.
    pub load_on_start: bool,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            movers_rows: 10,
            show_most_active: false,
            load_on_start: true,
        }
    }
}
