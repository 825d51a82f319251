// src/utils/http.rs

//! HTTP client utilities.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, SERVER};

use crate::error::{AppError, Result};
use crate::models::ScraperConfig;

/// Request headers sent with every page fetch.
pub const HTML_HEADERS: &[(&str, &str)] = &[("content-type", "text/html;charset=UTF-8")];

/// A fully read response, cheap to clone.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// Final URL after redirects
    pub url: String,
    pub status: u16,
    /// Value of the `server` response header, if any
    pub server: Option<String>,
    pub body: Arc<str>,
}

impl FetchedPage {
    pub fn new(url: impl Into<String>, status: u16, server: Option<&str>, body: &str) -> Self {
        Self {
            url: url.into(),
            status,
            server: server.map(str::to_string),
            body: Arc::from(body),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Outbound page source.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch `url` with extra request headers and read the whole body.
    async fn fetch(&self, url: &str, headers: &[(&str, &str)]) -> Result<FetchedPage>;
}

/// Create a configured asynchronous HTTP client.
pub fn create_async_client(config: &ScraperConfig) -> Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .user_agent(&config.user_agent)
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()?;
    Ok(client)
}

/// `PageFetcher` backed by reqwest.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    pub fn from_config(config: &ScraperConfig) -> Result<Self> {
        Ok(Self::new(create_async_client(config)?))
    }

    fn header_map(headers: &[(&str, &str)]) -> Result<HeaderMap> {
        let mut map = HeaderMap::new();
        for (name, value) in headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| AppError::validation(format!("bad header name {name}: {e}")))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| AppError::validation(format!("bad header value {value}: {e}")))?;
            map.insert(name, value);
        }
        Ok(map)
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str, headers: &[(&str, &str)]) -> Result<FetchedPage> {
        let response = self
            .client
            .get(url)
            .headers(Self::header_map(headers)?)
            .send()
            .await?;

        let final_url = response.url().to_string();
        let status = response.status().as_u16();
        let server = response
            .headers()
            .get(SERVER)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let body = response.text().await?;

        log::debug!("Fetched {} ({}, server: {:?})", final_url, status, server);

        Ok(FetchedPage {
            url: final_url,
            status,
            server,
            body: Arc::from(body),
        })
    }
}
