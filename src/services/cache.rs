//! Cache-aside gateway in front of the record mappers.

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;

use crate::error::Result;
use crate::storage::KvStore;

/// Store key of one cached record.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    LatestEvent { slug: String },
    Event { slug: String, id: String },
    Group { slug: String },
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LatestEvent { slug } => write!(f, "{}:latest:event", escape(slug)),
            Self::Event { slug, id } => write!(f, "{}:event:{}", escape(slug), escape(id)),
            Self::Group { slug } => write!(f, "{}:group", escape(slug)),
        }
    }
}

/// Escapes the key separator so a component never spans two segments.
fn escape(component: &str) -> String {
    component.replace('%', "%25").replace(':', "%3A")
}

/// Looks records up in the store and produces them on a miss.
///
/// Concurrent misses for one key each run the producer; the last write wins.
#[derive(Clone)]
pub struct CacheGateway {
    store: Arc<dyn KvStore>,
    ttl: Duration,
}

impl CacheGateway {
    pub fn new(store: Arc<dyn KvStore>, ttl: Duration) -> Self {
        Self { store, ttl }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Serialized record for `key`, from the store unless `bypass` is set.
    pub async fn resolve<T, F, Fut>(&self, key: &CacheKey, bypass: bool, producer: F) -> Result<String>
    where
        T: Serialize,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let key = key.to_string();

        if !bypass {
            match self.store.get(&key).await {
                Ok(Some(cached)) => {
                    log::debug!("Cache hit for {}", key);
                    return Ok(cached);
                }
                Ok(None) => log::debug!("Cache miss for {}", key),
                Err(e) => log::warn!("Cache read for {} failed, scraping instead: {}", key, e),
            }
        }

        let value = serde_json::to_string(&producer().await?)?;

        if let Err(e) = self.store.put(&key, &value, self.ttl).await {
            log::warn!("Cache write for {} failed: {}", key, e);
        }
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use serde_json::json;

    use super::*;
    use crate::error::AppError;
    use crate::storage::MemoryStore;

    struct BrokenStore;

    #[async_trait]
    impl KvStore for BrokenStore {
        async fn get(&self, _key: &str) -> Result<Option<String>> {
            Err(AppError::store("unreachable"))
        }

        async fn put(&self, _key: &str, _value: &str, _ttl: Duration) -> Result<()> {
            Err(AppError::store("unreachable"))
        }
    }

    fn gateway(store: Arc<dyn KvStore>) -> CacheGateway {
        CacheGateway::new(store, Duration::from_secs(60))
    }

    #[test]
    fn test_key_format() {
        let slug = "tridev".to_string();
        assert_eq!(
            CacheKey::LatestEvent { slug: slug.clone() }.to_string(),
            "tridev:latest:event"
        );
        assert_eq!(
            CacheKey::Event {
                slug: slug.clone(),
                id: "42".to_string()
            }
            .to_string(),
            "tridev:event:42"
        );
        assert_eq!(CacheKey::Group { slug }.to_string(), "tridev:group");
    }

    #[test]
    fn test_keys_never_collide() {
        let event = |slug: &str, id: &str| CacheKey::Event {
            slug: slug.to_string(),
            id: id.to_string(),
        };
        let latest = CacheKey::LatestEvent {
            slug: "tridev".to_string(),
        };

        assert_ne!(event("tridev", "latest").to_string(), latest.to_string());
        assert_ne!(
            event("a:b", "c").to_string(),
            event("a", "b:c").to_string()
        );
        assert_ne!(
            event("a%3Ab", "c").to_string(),
            event("a:b", "c").to_string()
        );
        assert_ne!(
            CacheKey::Group {
                slug: "tridev:latest".to_string()
            }
            .to_string(),
            latest.to_string()
        );
        assert_eq!(event("a:b", "c").to_string(), "a%3Ab:event:c");
    }

    #[tokio::test]
    async fn test_event_named_latest_keeps_its_own_entry() {
        let store = Arc::new(MemoryStore::new());
        let gateway = gateway(store.clone());
        let slug = "tridev".to_string();

        gateway
            .resolve(&CacheKey::LatestEvent { slug: slug.clone() }, false, || async {
                Ok("upcoming")
            })
            .await
            .unwrap();
        let value = gateway
            .resolve(
                &CacheKey::Event {
                    slug,
                    id: "latest".to_string(),
                },
                false,
                || async { Ok("by-id") },
            )
            .await
            .unwrap();

        assert_eq!(value, "\"by-id\"");
        assert_eq!(
            store.get("tridev:latest:event").await.unwrap().as_deref(),
            Some("\"upcoming\"")
        );
    }

    #[tokio::test]
    async fn test_hit_returns_stored_value_without_producing() {
        let store = Arc::new(MemoryStore::new());
        store
            .put("tridev:group", "{ \"stored\" : true }", Duration::from_secs(60))
            .await
            .unwrap();
        let calls = AtomicUsize::new(0);

        let value = gateway(store)
            .resolve(
                &CacheKey::Group {
                    slug: "tridev".to_string(),
                },
                false,
                || async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(json!({ "stored": false }))
                },
            )
            .await
            .unwrap();

        assert_eq!(value, "{ \"stored\" : true }");
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_miss_produces_and_stores() {
        let store = Arc::new(MemoryStore::new());
        let key = CacheKey::Event {
            slug: "tridev".to_string(),
            id: "1".to_string(),
        };

        let value = gateway(store.clone())
            .resolve(&key, false, || async { Ok(json!({ "id": "1" })) })
            .await
            .unwrap();

        assert_eq!(value, r#"{"id":"1"}"#);
        assert_eq!(
            store.get("tridev:event:1").await.unwrap().as_deref(),
            Some(r#"{"id":"1"}"#)
        );
    }

    #[tokio::test]
    async fn test_bypass_always_produces_and_overwrites() {
        let store = Arc::new(MemoryStore::new());
        store
            .put("tridev:latest:event", "old", Duration::from_secs(60))
            .await
            .unwrap();
        let key = CacheKey::LatestEvent {
            slug: "tridev".to_string(),
        };

        let value = gateway(store.clone())
            .resolve(&key, true, || async { Ok("new") })
            .await
            .unwrap();

        assert_eq!(value, "\"new\"");
        assert_eq!(
            store.get("tridev:latest:event").await.unwrap().as_deref(),
            Some("\"new\"")
        );
    }

    #[tokio::test]
    async fn test_producer_error_is_not_cached() {
        let store = Arc::new(MemoryStore::new());
        let key = CacheKey::Group {
            slug: "gone".to_string(),
        };

        let result = gateway(store.clone())
            .resolve(&key, false, || async {
                Err::<String, _>(AppError::not_found("gone"))
            })
            .await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
        assert_eq!(store.get("gone:group").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_store_failures_fall_back_to_producer() {
        let value = gateway(Arc::new(BrokenStore))
            .resolve(
                &CacheKey::Group {
                    slug: "tridev".to_string(),
                },
                false,
                || async { Ok(7) },
            )
            .await
            .unwrap();
        assert_eq!(value, "7");
    }
}
