// src/models/mod.rs

//! Domain models for the scraper application.
//!
//! Records are value objects created fresh per request; only their
//! serialized form outlives a request, inside the cache.

mod config;
mod event;
mod group;
mod matches;

// Re-export all public types
pub use config::{CacheBackend, CacheConfig, Config, LoggingConfig, ScraperConfig, ServerConfig};
pub use event::{EventSummary, ScrapedEvent};
pub use group::{ScrapedGroup, Sponsor, Topic, UPCOMING_EVENT_SLOTS};
pub use matches::{AttributeMatchSet, MatchSet, SelectorMatchSet};
