//! AWS S3 store.
//!
//! Envelopes live at `{bucket}/{prefix}/cache/{key}.json`.

use std::time::Duration;

use async_trait::async_trait;
use aws_sdk_s3::Client;
use aws_sdk_s3::primitives::ByteStream;
use tracing::{debug, info};

use crate::error::{AppError, Result};
use crate::storage::{KvStore, StoredValue};

/// S3-backed store shared by every instance of the service.
#[derive(Clone)]
pub struct S3Store {
    client: Client,
    bucket: String,
    prefix: String,
}

impl S3Store {
    /// Create a new S3 store instance.
    pub fn new(client: Client, bucket: impl Into<String>, prefix: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
            prefix: prefix.into(),
        }
    }

    /// Create S3 store from environment configuration.
    pub async fn from_env() -> Result<Self> {
        let config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        let client = Client::new(&config);

        let bucket =
            std::env::var("S3_BUCKET").unwrap_or_else(|_| "meetup-scraper-cache".to_string());
        let prefix = std::env::var("S3_PREFIX").unwrap_or_else(|_| "meetup".to_string());

        info!("Using S3 cache at s3://{}/{}", bucket, prefix);
        Ok(Self::new(client, bucket, prefix))
    }

    fn object_key(&self, key: &str) -> String {
        format!("{}/cache/{}.json", self.prefix.trim_end_matches('/'), key)
    }
}

#[async_trait]
impl KvStore for S3Store {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let object_key = self.object_key(key);
        let result = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(&object_key)
            .send()
            .await;

        let output = match result {
            Ok(output) => output,
            Err(err) => {
                let service_err = err.into_service_error();
                if service_err.is_no_such_key() {
                    debug!("No cache entry at s3://{}/{}", self.bucket, object_key);
                    return Ok(None);
                }
                return Err(AppError::store(service_err));
            }
        };

        let bytes = output.body.collect().await.map_err(AppError::store)?;
        let stored: StoredValue = serde_json::from_slice(&bytes.into_bytes())?;
        if stored.is_expired() {
            debug!("Cache entry s3://{}/{} expired", self.bucket, object_key);
            return Ok(None);
        }
        Ok(Some(stored.value))
    }

    async fn put(&self, key: &str, value: &str, ttl: Duration) -> Result<()> {
        let stored = StoredValue::new(value, ttl)?;
        let body = ByteStream::from(serde_json::to_vec(&stored)?);
        let object_key = self.object_key(key);

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&object_key)
            .body(body)
            .content_type("application/json")
            .send()
            .await
            .map_err(AppError::store)?;

        debug!("Wrote s3://{}/{}", self.bucket, object_key);
        Ok(())
    }
}
