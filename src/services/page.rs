//! Scraper facade over one fetched page.

use regex::Regex;
use scraper::Html;
use url::Url;

use crate::error::{AppError, Result};
use crate::html::{extract_attribute, extract_text};
use crate::models::{AttributeMatchSet, SelectorMatchSet};
use crate::utils::http::{FetchedPage, HTML_HEADERS, PageFetcher};
use crate::utils::text_from_html;

/// Statuses the edge platform answers with when it, not the source, failed.
const EDGE_FAILURE_STATUSES: [u16; 5] = [530, 503, 502, 403, 400];

/// A fetched page ready for extraction passes.
///
/// The only way to get one is [`PageScraper::fetch`] (or
/// [`PageScraper::from_page`]), so extraction on an unfetched page cannot be
/// expressed. Clones share the retained response body.
#[derive(Debug, Clone)]
pub struct PageScraper {
    page: FetchedPage,
}

impl PageScraper {
    /// Fetch `url` and classify the response.
    pub async fn fetch(fetcher: &dyn PageFetcher, url: &Url, edge_server: &str) -> Result<Self> {
        let page = fetcher.fetch(url.as_str(), HTML_HEADERS).await?;
        Self::from_page(page, edge_server)
    }

    /// Wrap an already fetched page, rejecting edge-platform failures.
    pub fn from_page(page: FetchedPage, edge_server: &str) -> Result<Self> {
        if is_edge_failure(page.status, page.server.as_deref(), edge_server) {
            return Err(AppError::UpstreamBlocked {
                status: page.status,
                server: page.server.unwrap_or_else(|| "none".to_string()),
            });
        }
        Ok(Self { page })
    }

    pub fn status(&self) -> u16 {
        self.page.status
    }

    pub fn url(&self) -> &str {
        &self.page.url
    }

    /// Fail on any non-success status the source site answered with.
    pub fn ensure_success(&self) -> Result<&Self> {
        if self.page.is_success() {
            Ok(self)
        } else {
            Err(AppError::Upstream(self.page.status))
        }
    }

    /// A fresh, independent read of the retained body.
    fn document(&self) -> Html {
        Html::parse_document(&self.page.body)
    }

    /// One pass collecting text blocks for all `selectors`.
    pub fn text(&self, selectors: &[&str], spaced: bool) -> Result<SelectorMatchSet> {
        extract_text(&self.document(), selectors, spaced)
    }

    /// One pass per selector, reading `attributes[i]` for `selectors[i]`.
    pub fn attributes(&self, selectors: &[&str], attributes: &[&str]) -> Result<AttributeMatchSet> {
        if selectors.len() != attributes.len() {
            return Err(AppError::validation(format!(
                "{} selectors but {} attributes",
                selectors.len(),
                attributes.len()
            )));
        }

        let mut result = AttributeMatchSet::new();
        for (selector, attribute) in selectors.iter().zip(attributes) {
            let values = extract_attribute(&self.document(), selector, attribute)?;
            result.insert(*selector, values);
        }
        Ok(result)
    }

    /// First capture group of `pattern` in the raw body.
    pub fn capture(&self, pattern: &Regex) -> String {
        text_from_html(&self.page.body, pattern)
    }
}

/// True when the response came from the edge platform rather than the source.
///
/// A missing `server` header counts as the edge too: that is what a local
/// preview of the edge runtime returns.
pub fn is_edge_failure(status: u16, server: Option<&str>, edge_server: &str) -> bool {
    if !EDGE_FAILURE_STATUSES.contains(&status) {
        return false;
    }
    match server {
        None => true,
        Some(server) => server.trim().eq_ignore_ascii_case(edge_server),
    }
}
