//! Key-value storage backends for persisted lists.

use crate::error::{Error, Result};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

/// String key-value storage.
///
/// Values are opaque blobs; callers serialize whole collections into one key.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Storage: Send + Sync {
    async fn get_item(&self, key: &str) -> Result<Option<String>>;
    async fn set_item(&self, key: &str, value: &str) -> Result<()>;
}

/// Storage kept in process memory. Nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: Mutex<BTreeMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.items.lock().await.get(key).cloned())
    }

    async fn set_item(&self, key: &str, value: &str) -> Result<()> {
        self.items
            .lock()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Storage backed by a single JSON file mapping keys to blobs.
///
/// Writes go to a sibling temp file which is then renamed over the original,
/// so a crash mid-write leaves the previous contents intact.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_all(&self) -> Result<BTreeMap<String, String>> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => {
                return Err(Error::persistence(format!(
                    "failed to read {}: {e}",
                    self.path.display()
                )));
            }
        };

        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }

        serde_json::from_str(&content).map_err(|e| {
            Error::persistence(format!("corrupted storage file {}: {e}", self.path.display()))
        })
    }

    async fn write_all(&self, items: &BTreeMap<String, String>) -> Result<()> {
        let persist = |e: std::io::Error| {
            Error::persistence(format!("failed to write {}: {e}", self.path.display()))
        };

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent).await.map_err(persist)?;
        }

        let content = serde_json::to_string_pretty(items)?;
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, content).await.map_err(persist)?;
        tokio::fs::rename(&tmp, &self.path).await.map_err(persist)?;
        Ok(())
    }
}

#[async_trait]
impl Storage for FileStorage {
    async fn get_item(&self, key: &str) -> Result<Option<String>> {
        let _guard = self.lock.lock().await;
        Ok(self.read_all().await?.remove(key))
    }

    async fn set_item(&self, key: &str, value: &str) -> Result<()> {
        let _guard = self.lock.lock().await;
        let mut items = self.read_all().await?;
        items.insert(key.to_string(), value.to_string());
        self.write_all(&items).await?;
        tracing::debug!(key, path = %self.path.display(), "storage item written");
        Ok(())
    }
}
