//! Local filesystem store.
//!
//! ## Storage Layout
//!
//! ```text
//! {root}/
//! └── {sha256(key)}.json    # one envelope per cache key
//! ```
//!
//! Keys are hashed so any key maps to a safe file name.

use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};
use crate::storage::{KvStore, StoredValue};

/// Sequence for temp file names, so concurrent writers never share one.
static TMP_SEQ: AtomicU64 = AtomicU64::new(0);

/// Filesystem-backed store for development and single-host deployments.
#[derive(Debug, Clone)]
pub struct LocalStore {
    root_dir: PathBuf,
}

impl LocalStore {
    /// Create a new LocalStore rooted at the given directory.
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
        }
    }

    /// File holding the envelope for `key`.
    fn path(&self, key: &str) -> PathBuf {
        let digest = Sha256::digest(key.as_bytes());
        self.root_dir.join(format!("{}.json", hex::encode(digest)))
    }

    /// Write bytes atomically (write to temp, then rename).
    async fn write_bytes(&self, path: &PathBuf, bytes: &[u8]) -> Result<()> {
        tokio::fs::create_dir_all(&self.root_dir).await?;

        let seq = TMP_SEQ.fetch_add(1, Ordering::Relaxed);
        let tmp = path.with_extension(format!("{}.{}.tmp", std::process::id(), seq));
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(bytes).await?;
        file.flush().await?;
        drop(file);

        if let Err(e) = tokio::fs::rename(&tmp, path).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(AppError::Io(e));
        }
        Ok(())
    }

    /// Read bytes, returning None if file doesn't exist.
    async fn read_bytes(&self, path: &PathBuf) -> Result<Option<Vec<u8>>> {
        match tokio::fs::read(path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::Io(e)),
        }
    }

    async fn remove(&self, path: &PathBuf) -> Result<()> {
        match tokio::fs::remove_file(path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::Io(e)),
        }
    }
}

#[async_trait]
impl KvStore for LocalStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path(key);
        let Some(bytes) = self.read_bytes(&path).await? else {
            return Ok(None);
        };

        let stored: StoredValue = serde_json::from_slice(&bytes)?;
        if stored.is_expired() {
            log::debug!("Cache entry for {} expired at {}", key, stored.expires_at);
            self.remove(&path).await?;
            return Ok(None);
        }
        Ok(Some(stored.value))
    }

    async fn put(&self, key: &str, value: &str, ttl: Duration) -> Result<()> {
        let stored = StoredValue::new(value, ttl)?;
        let bytes = serde_json::to_vec(&stored)?;
        self.write_bytes(&self.path(key), &bytes).await
    }
}
