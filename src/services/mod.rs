//! Service layer for the scraper application.
//!
//! This module contains the business logic for:
//! - Page fetching and extraction (`PageScraper`)
//! - Record mapping (`MeetupScraper`)
//! - Cache-aside lookups (`CacheGateway`, `RecordService`)

mod cache;
mod events;
mod groups;
mod meetup;
mod page;
mod records;
pub mod selectors;

pub use cache::{CacheGateway, CacheKey};
pub use meetup::{MeetupScraper, ScrapeSettings};
pub use page::{PageScraper, is_edge_failure};
pub use records::RecordService;
