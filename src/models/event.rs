//! Event records.

use serde::{Deserialize, Serialize};

/// A single event scraped from its detail page.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ScrapedEvent {
    /// Event identifier taken from the event URL
    pub id: String,

    /// Slug of the hosting group
    pub group_slug: String,

    /// Canonical event URL
    pub href: String,

    /// Canonical group URL
    pub group_href: String,

    pub name: String,

    pub description: String,

    /// ISO 8601 UTC start time, empty when the page title had no date
    pub date: String,

    pub location: String,

    pub group_name: String,

    pub group_type: String,

    pub featured_image: String,
}

/// Short form of an event as listed on a group page.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct EventSummary {
    pub id: String,
    pub href: String,
    pub name: String,
    pub date: String,
}

impl EventSummary {
    /// True when the card this summary was built from was absent.
    pub fn is_empty(&self) -> bool {
        self.id.is_empty() && self.href.is_empty() && self.name.is_empty() && self.date.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_camel_case() {
        let event = ScrapedEvent {
            id: "296383512".to_string(),
            group_slug: "tridev".to_string(),
            ..ScrapedEvent::default()
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["groupSlug"], "tridev");
        assert_eq!(json["featuredImage"], "");
        assert!(json.get("group_slug").is_none());
    }

    #[test]
    fn test_empty_summary() {
        assert!(EventSummary::default().is_empty());
        let summary = EventSummary {
            name: "Lightning talks".to_string(),
            ..EventSummary::default()
        };
        assert!(!summary.is_empty());
    }
}
