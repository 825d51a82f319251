//! Record mappers for Meetup pages.

use std::sync::Arc;

use chrono::FixedOffset;
use url::Url;

use crate::error::{AppError, Result};
use crate::models::Config;
use crate::services::page::PageScraper;
use crate::utils::http::PageFetcher;

/// Settings the mappers need from configuration.
#[derive(Debug, Clone)]
pub struct ScrapeSettings {
    pub base_url: Url,
    pub timezone: FixedOffset,
    pub edge_server: String,
}

impl ScrapeSettings {
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self {
            base_url: config.base_url()?,
            timezone: config.timezone()?,
            edge_server: config.scraper.edge_server.clone(),
        })
    }
}

/// Turns Meetup pages into typed records.
///
/// Every public operation reports any failure as a single
/// [`AppError::NotFound`]; no partial record is ever returned.
#[derive(Clone)]
pub struct MeetupScraper {
    fetcher: Arc<dyn PageFetcher>,
    settings: ScrapeSettings,
}

impl MeetupScraper {
    pub fn new(fetcher: Arc<dyn PageFetcher>, settings: ScrapeSettings) -> Self {
        Self { fetcher, settings }
    }

    pub fn settings(&self) -> &ScrapeSettings {
        &self.settings
    }

    /// Source URL made of the base URL plus `segments`, with a trailing slash.
    pub fn page_url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.settings.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| AppError::config("base URL cannot be a base"))?
            .pop_if_empty()
            .extend(segments)
            .push("");
        Ok(url)
    }

    pub fn group_url(&self, group_slug: &str) -> Result<Url> {
        self.page_url(&[group_slug])
    }

    pub fn event_url(&self, group_slug: &str, event_id: &str) -> Result<Url> {
        self.page_url(&[group_slug, "events", event_id])
    }

    /// Fetch a page and insist on a successful source response.
    pub(crate) async fn fetch_page(&self, url: &Url) -> Result<PageScraper> {
        log::debug!("Fetching {}", url);
        let page =
            PageScraper::fetch(self.fetcher.as_ref(), url, &self.settings.edge_server).await?;
        log::debug!("Fetched {} with status {}", page.url(), page.status());
        page.ensure_success()?;
        Ok(page)
    }

    pub(crate) fn timezone(&self) -> FixedOffset {
        self.settings.timezone
    }
}

/// Collapse any mapper failure into the single not-found outcome.
pub(crate) fn not_found_boundary<T>(what: &str, result: Result<T>) -> Result<T> {
    result.map_err(|e| match e {
        AppError::NotFound(_) => {
            log::info!("{}: {}", what, e);
            e
        }
        other => {
            log::warn!("{} failed: {}", what, other);
            AppError::not_found(format!("{what}: {other}"))
        }
    })
}

#[cfg(test)]
pub(crate) mod testing {
    //! Canned pages served in place of the network.

    use std::collections::HashMap;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::utils::date::resolve_timezone;
    use crate::utils::http::FetchedPage;

    #[derive(Default)]
    pub struct FakeFetcher {
        pages: HashMap<String, FetchedPage>,
        pub requests: Mutex<Vec<String>>,
    }

    impl FakeFetcher {
        pub fn with_page(mut self, url: &str, status: u16, server: Option<&str>, body: &str) -> Self {
            self.pages
                .insert(url.to_string(), FetchedPage::new(url, status, server, body));
            self
        }

        pub fn request_count(&self) -> usize {
            self.requests.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl PageFetcher for FakeFetcher {
        async fn fetch(&self, url: &str, _headers: &[(&str, &str)]) -> Result<FetchedPage> {
            self.requests.lock().unwrap().push(url.to_string());
            Ok(self.pages.get(url).cloned().unwrap_or_else(|| {
                FetchedPage::new(url, 404, Some("nginx"), "<h1>Page not found</h1>")
            }))
        }
    }

    pub fn settings() -> ScrapeSettings {
        ScrapeSettings {
            base_url: Url::parse("https://www.meetup.com").unwrap(),
            timezone: resolve_timezone("EST").unwrap(),
            edge_server: "cloudflare".to_string(),
        }
    }

    pub fn scraper(fetcher: FakeFetcher) -> (MeetupScraper, Arc<FakeFetcher>) {
        let fetcher = Arc::new(fetcher);
        (MeetupScraper::new(fetcher.clone(), settings()), fetcher)
    }
}

#[cfg(test)]
mod tests {
    use super::testing::*;
    use super::*;

    #[test]
    fn test_urls() {
        let (scraper, _) = scraper(FakeFetcher::default());
        assert_eq!(
            scraper.group_url("tridev").unwrap().as_str(),
            "https://www.meetup.com/tridev/"
        );
        assert_eq!(
            scraper.event_url("tridev", "296383512").unwrap().as_str(),
            "https://www.meetup.com/tridev/events/296383512/"
        );
    }

    #[test]
    fn test_url_segments_are_escaped() {
        let (scraper, _) = scraper(FakeFetcher::default());
        let url = scraper.group_url("a/b?c").unwrap();
        assert_eq!(url.as_str(), "https://www.meetup.com/a%2Fb%3Fc/");
    }

    #[test]
    fn test_boundary_maps_everything_to_not_found() {
        let blocked: Result<()> = Err(AppError::UpstreamBlocked {
            status: 503,
            server: "none".to_string(),
        });
        assert!(matches!(
            not_found_boundary("group", blocked),
            Err(AppError::NotFound(_))
        ));
        assert!(not_found_boundary("group", Ok(1)).is_ok());
    }
}
