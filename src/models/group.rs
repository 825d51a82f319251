//! Group records.

use serde::{Deserialize, Serialize};

use super::EventSummary;

/// Number of upcoming event cards read from a group page.
pub const UPCOMING_EVENT_SLOTS: usize = 4;

/// A group scraped from its home page.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ScrapedGroup {
    pub slug: String,
    pub href: String,
    pub name: String,
    pub location: String,
    pub member_count: u64,
    pub group_type: String,
    pub description: String,
    pub featured_image: String,
    pub other_link: String,
    pub twitter_link: String,

    /// Always `UPCOMING_EVENT_SLOTS` long; missing cards are empty summaries
    pub upcoming_events: Vec<EventSummary>,

    pub past_event: EventSummary,
    pub sponsors: Vec<Sponsor>,
    pub topics: Vec<Topic>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Sponsor {
    pub name: String,
    pub description: String,
    pub href: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Topic {
    pub name: String,
    pub href: String,
}
