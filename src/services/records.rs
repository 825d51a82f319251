//! Cached record lookups shared by the HTTP API and the CLI.

use std::sync::Arc;
use std::time::Duration;

use crate::error::{AppError, Result};
use crate::models::Config;
use crate::services::cache::{CacheGateway, CacheKey};
use crate::services::meetup::{MeetupScraper, ScrapeSettings};
use crate::storage::build_store;
use crate::utils::http::HttpFetcher;

/// Resolves serialized records through the cache gateway.
#[derive(Clone)]
pub struct RecordService {
    gateway: CacheGateway,
    scraper: MeetupScraper,
}

impl RecordService {
    pub fn new(gateway: CacheGateway, scraper: MeetupScraper) -> Self {
        Self { gateway, scraper }
    }

    /// Wire the reqwest fetcher and the configured store together.
    pub async fn from_config(config: &Config) -> Result<Self> {
        config.validate()?;

        let fetcher = HttpFetcher::from_config(&config.scraper)?;
        let scraper = MeetupScraper::new(Arc::new(fetcher), ScrapeSettings::from_config(config)?);
        let store = build_store(&config.cache).await?;
        let gateway = CacheGateway::new(store, Duration::from_secs(config.cache.ttl_secs));

        log::info!(
            "Scraping {} with {:?} cache (ttl {}s)",
            config.scraper.base_url,
            config.cache.backend,
            config.cache.ttl_secs
        );
        Ok(Self::new(gateway, scraper))
    }

    /// Latest upcoming event of a group.
    pub async fn latest(&self, group_slug: &str, fresh: bool) -> Result<String> {
        let slug = required(group_slug)?;
        let key = CacheKey::LatestEvent {
            slug: slug.to_string(),
        };

        self.gateway
            .resolve(&key, fresh, || async {
                let event_id = self.scraper.latest_event_id(slug).await?;
                self.scraper.scrape_event(slug, &event_id).await
            })
            .await
    }

    pub async fn event(&self, group_slug: &str, event_id: &str, fresh: bool) -> Result<String> {
        let slug = required(group_slug)?;
        let id = required(event_id)?;
        let key = CacheKey::Event {
            slug: slug.to_string(),
            id: id.to_string(),
        };

        self.gateway
            .resolve(&key, fresh, || self.scraper.scrape_event(slug, id))
            .await
    }

    pub async fn group(&self, group_slug: &str, fresh: bool) -> Result<String> {
        let slug = required(group_slug)?;
        let key = CacheKey::Group {
            slug: slug.to_string(),
        };

        self.gateway
            .resolve(&key, fresh, || self.scraper.scrape_group(slug))
            .await
    }
}

fn required(id: &str) -> Result<&str> {
    let id = id.trim();
    if id.is_empty() {
        Err(AppError::validation("Missing id."))
    } else {
        Ok(id)
    }
}
