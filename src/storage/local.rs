//! Local JSON file storage for the publish history.

use std::path::PathBuf;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;

use crate::error::Result;
use crate::models::History;
use crate::storage::HistoryStore;

/// History store backed by a single JSON file.
#[derive(Debug, Clone)]
pub struct JsonHistoryStore {
    path: PathBuf,
}

impl JsonHistoryStore {
    /// Create a store for the given cache file path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The cache file path.
    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    async fn try_load(&self) -> Result<History> {
        let bytes = tokio::fs::read(&self.path).await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Write bytes atomically (write to temp, then rename).
    async fn write_bytes(&self, bytes: &[u8]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let tmp = self.path.with_extension("tmp");
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(bytes).await?;
        file.flush().await?;
        drop(file);

        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }

    async fn try_persist(&self, history: &History) -> Result<()> {
        let bytes = serde_json::to_vec(history)?;
        self.write_bytes(&bytes).await
    }
}

#[async_trait]
impl HistoryStore for JsonHistoryStore {
    async fn exists(&self) -> bool {
        tokio::fs::try_exists(&self.path).await.unwrap_or(false)
    }

    async fn load(&self) -> History {
        match self.try_load().await {
            Ok(history) => {
                log::debug!("Loaded {} cached fingerprints", history.len());
                history
            }
            Err(e) => {
                log::debug!(
                    "No usable cache at {:?} ({}). Starting with an empty history.",
                    self.path,
                    e
                );
                History::new()
            }
        }
    }

    async fn persist(&self, limit: usize, history: &History) {
        // An empty in-memory history must not overwrite an existing file.
        if history.is_empty() {
            log::debug!("History is empty, skipping cache write");
            return;
        }

        let mut bounded = history.clone();
        let dropped = bounded.evict_to(limit);
        if dropped > 0 {
            log::info!("Cache limit reached. Removing {} items.", dropped);
        }

        if let Err(e) = self.try_persist(&bounded).await {
            log::error!("Failed to write cache file {:?}: {}", self.path, e);
        }
    }
}
