//! Key-value stores backing the record cache.
//!
//! Every backend keeps the same envelope per key:
//!
//! ```text
//! { "value": "<serialized record>", "expires_at": "2026-10-20T12:00:00Z" }
//! ```
//!
//! Expired entries read as misses.

pub mod local;
pub mod memory;
#[cfg(feature = "s3")]
pub mod s3;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::models::{CacheBackend, CacheConfig};

// Re-export for convenience
pub use local::LocalStore;
pub use memory::MemoryStore;

/// Minimal key-value contract required by the cache gateway.
#[async_trait]
pub trait KvStore: Send + Sync {
    /// Stored value for `key`, or `None` when absent or expired.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key` for `ttl`.
    async fn put(&self, key: &str, value: &str, ttl: Duration) -> Result<()>;
}

/// A stored value with its expiry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoredValue {
    pub value: String,
    pub expires_at: DateTime<Utc>,
}

impl StoredValue {
    pub fn new(value: impl Into<String>, ttl: Duration) -> Result<Self> {
        let ttl = chrono::Duration::from_std(ttl).map_err(AppError::store)?;
        Ok(Self {
            value: value.into(),
            expires_at: Utc::now() + ttl,
        })
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }
}

/// Build the store selected in configuration.
pub async fn build_store(config: &CacheConfig) -> Result<Arc<dyn KvStore>> {
    match config.backend {
        CacheBackend::Memory => Ok(Arc::new(MemoryStore::new())),
        CacheBackend::Local => Ok(Arc::new(LocalStore::new(&config.dir))),
        #[cfg(feature = "s3")]
        CacheBackend::S3 => Ok(Arc::new(s3::S3Store::from_env().await?)),
        #[cfg(not(feature = "s3"))]
        CacheBackend::S3 => Err(AppError::config(
            "cache.backend = \"s3\" requires the 's3' feature",
        )),
    }
}
