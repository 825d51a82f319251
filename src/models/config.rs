//! Application configuration structures.

use std::fs;
use std::path::Path;

use chrono::FixedOffset;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{AppError, Result};
use crate::utils::date::resolve_timezone;

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Outbound fetch settings
    #[serde(default)]
    pub scraper: ScraperConfig,

    /// Cache-aside settings
    #[serde(default)]
    pub cache: CacheConfig,

    /// HTTP API settings
    #[serde(default)]
    pub server: ServerConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Timezone the source site renders local dates in
    #[serde(default = "defaults::timezone_name")]
    pub timezone_name: String,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Apply overrides from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_overrides(|name| std::env::var(name).ok());
    }

    /// Apply overrides from an arbitrary variable lookup.
    ///
    /// Unparsable numeric values are ignored and the previous value is kept.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(name) = lookup("TIMEZONE_NAME") {
            self.timezone_name = name;
        }

        if let Some(ttl) = lookup("CACHE_TTL") {
            if let Ok(secs) = ttl.trim().parse() {
                self.cache.ttl_secs = secs;
            }
        }

        if let Some(timeout) = lookup("SCRAPE_TIMEOUT_SECS") {
            if let Ok(secs) = timeout.trim().parse() {
                self.scraper.timeout_secs = secs;
            }
        }

        if let Some(base_url) = lookup("BASE_URL") {
            self.scraper.base_url = base_url;
        }

        if let Some(bind) = lookup("BIND_ADDR") {
            self.server.bind = bind;
        }
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.scraper.user_agent.trim().is_empty() {
            return Err(AppError::validation("scraper.user_agent is empty"));
        }
        if self.scraper.timeout_secs == 0 {
            return Err(AppError::validation("scraper.timeout_secs must be > 0"));
        }
        if self.cache.ttl_secs == 0 {
            return Err(AppError::validation("cache.ttl_secs must be > 0"));
        }
        self.base_url()?;
        self.timezone()?;
        Ok(())
    }

    /// Parsed base URL of the source site.
    pub fn base_url(&self) -> Result<Url> {
        let url = Url::parse(&self.scraper.base_url)?;
        if url.cannot_be_a_base() {
            return Err(AppError::config(format!(
                "scraper.base_url cannot be a base: {}",
                self.scraper.base_url
            )));
        }
        Ok(url)
    }

    /// Fixed offset for the configured timezone name.
    pub fn timezone(&self) -> Result<FixedOffset> {
        resolve_timezone(&self.timezone_name).ok_or_else(|| {
            AppError::config(format!("Unknown timezone name: {}", self.timezone_name))
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            scraper: ScraperConfig::default(),
            cache: CacheConfig::default(),
            server: ServerConfig::default(),
            logging: LoggingConfig::default(),
            timezone_name: defaults::timezone_name(),
        }
    }
}

/// HTTP client settings for the source site.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScraperConfig {
    /// Source site root
    #[serde(default = "defaults::base_url")]
    pub base_url: String,

    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// `server` header value identifying the edge platform in front of us
    #[serde(default = "defaults::edge_server")]
    pub edge_server: String,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::base_url(),
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
            edge_server: defaults::edge_server(),
        }
    }
}

/// Which key-value store backs the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CacheBackend {
    #[default]
    Memory,
    Local,
    S3,
}

/// Cache-aside settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Lifetime of a cached record in seconds
    #[serde(default = "defaults::cache_ttl")]
    pub ttl_secs: u64,

    #[serde(default)]
    pub backend: CacheBackend,

    /// Root directory for the local backend
    #[serde(default = "defaults::cache_dir")]
    pub dir: String,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: defaults::cache_ttl(),
            backend: CacheBackend::default(),
            dir: defaults::cache_dir(),
        }
    }
}

/// HTTP API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "defaults::bind")]
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: defaults::bind(),
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "defaults::log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::log_level(),
        }
    }
}

mod defaults {
    pub fn base_url() -> String {
        "https://www.meetup.com".into()
    }
    pub fn user_agent() -> String {
        "Mozilla/5.0 (compatible; meetup-scraper/0.1)".into()
    }
    pub fn timeout() -> u64 {
        30
    }
    pub fn edge_server() -> String {
        "cloudflare".into()
    }
    pub fn cache_ttl() -> u64 {
        60 * 60 * 24
    }
    pub fn cache_dir() -> String {
        "storage/cache".into()
    }
    pub fn bind() -> String {
        "127.0.0.1:8787".into()
    }
    pub fn log_level() -> String {
        "info".into()
    }
    pub fn timezone_name() -> String {
        "EST".into()
    }
}
