//! In-process store, the default backend.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::Result;
use crate::storage::{KvStore, StoredValue};

/// Map of envelopes behind an async lock.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, StoredValue>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries, expired ones included.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }
}

#[async_trait]
impl KvStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        {
            let entries = self.entries.read().await;
            match entries.get(key) {
                None => return Ok(None),
                Some(stored) if !stored.is_expired() => return Ok(Some(stored.value.clone())),
                Some(_) => {}
            }
        }

        let mut entries = self.entries.write().await;
        if entries.get(key).is_some_and(StoredValue::is_expired) {
            entries.remove(key);
            return Ok(None);
        }
        Ok(entries.get(key).map(|stored| stored.value.clone()))
    }

    async fn put(&self, key: &str, value: &str, ttl: Duration) -> Result<()> {
        let stored = StoredValue::new(value, ttl)?;
        let mut entries = self.entries.write().await;
        entries.retain(|_, existing| !existing.is_expired());
        entries.insert(key.to_string(), stored);
        Ok(())
    }
}
