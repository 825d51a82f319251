//! Event mapping: latest event id and event detail pages.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::{AppError, Result};
use crate::html::normalize_attribute;
use crate::models::ScrapedEvent;
use crate::services::meetup::{MeetupScraper, not_found_boundary};
use crate::services::selectors::{event, group};
use crate::utils::date::{local_to_iso, title_date_fragment};
use crate::utils::{preview, url_segment};

/// Index of the event id in a `/`-split event URL.
const EVENT_ID_SEGMENT: usize = 5;

/// `og:image` meta tag, used when the hero picture is missing.
static OG_IMAGE: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r#"<meta[^>]*property="og:image"[^>]*content="([^"]*)""#).ok()
});

impl MeetupScraper {
    /// Id of the first upcoming event listed on a group page.
    pub async fn latest_event_id(&self, group_slug: &str) -> Result<String> {
        not_found_boundary(
            &format!("latest event of {group_slug}"),
            self.try_latest_event_id(group_slug).await,
        )
    }

    async fn try_latest_event_id(&self, group_slug: &str) -> Result<String> {
        let page = self.fetch_page(&self.group_url(group_slug)?).await?;
        let links = page.attributes(&[group::FIRST_EVENT_LINK], &["href"])?;

        let href = links
            .first(group::FIRST_EVENT_LINK)
            .ok_or_else(|| AppError::not_found(format!("no upcoming event card for {group_slug}")))?;
        log::debug!("Event href is: {}", href);

        url_segment(href, EVENT_ID_SEGMENT)
            .map(str::to_string)
            .ok_or_else(|| AppError::not_found(format!("no event id in {href}")))
    }

    /// Scrape one event page.
    pub async fn scrape_event(&self, group_slug: &str, event_id: &str) -> Result<ScrapedEvent> {
        not_found_boundary(
            &format!("event {group_slug}/{event_id}"),
            self.try_scrape_event(group_slug, event_id).await,
        )
    }

    async fn try_scrape_event(&self, group_slug: &str, event_id: &str) -> Result<ScrapedEvent> {
        let event_url = self.event_url(group_slug, event_id)?;
        let page = self.fetch_page(&event_url).await?;

        let text = page.text(event::TEXT, true)?;
        let images = page.attributes(&[event::FEATURED_IMAGE], &["src"])?;

        let name = text.required(event::NAME)?.to_string();

        let date = match text.first(event::TITLE) {
            Some(title) => {
                let fragment = title_date_fragment(title);
                log::debug!("Event title date is: {}", fragment);
                local_to_iso(&fragment, self.timezone())?
            }
            None => String::new(),
        };

        let featured_image = match images.first(event::FEATURED_IMAGE) {
            Some(src) => src.to_string(),
            None => OG_IMAGE
                .as_ref()
                .map(|pattern| normalize_attribute(&page.capture(pattern)))
                .unwrap_or_default(),
        };

        let description = text.first_or_empty(event::DESCRIPTION);
        log::debug!("Event description is: {}", preview(&description, 100));

        Ok(ScrapedEvent {
            id: event_id.to_string(),
            group_slug: group_slug.to_string(),
            href: event_url.to_string(),
            group_href: self.group_url(group_slug)?.to_string(),
            name,
            description,
            date,
            location: text.first_or_empty(event::LOCATION),
            group_name: text.first_or_empty(event::GROUP_NAME),
            group_type: text.first_or_empty(event::GROUP_TYPE),
            featured_image,
        })
    }
}
