//! Group mapping.

use crate::error::Result;
use crate::models::{
    AttributeMatchSet, EventSummary, ScrapedGroup, SelectorMatchSet, Sponsor, Topic,
    UPCOMING_EVENT_SLOTS,
};
use crate::services::meetup::{MeetupScraper, not_found_boundary};
use crate::services::selectors::group::{self, EventCard};
use crate::utils::date::{local_to_iso, strip_card_zone};
use crate::utils::{dedup_preserving_order, url_segment};

const EVENT_ID_SEGMENT: usize = 5;

impl MeetupScraper {
    /// Scrape a group home page.
    pub async fn scrape_group(&self, group_slug: &str) -> Result<ScrapedGroup> {
        not_found_boundary(
            &format!("group {group_slug}"),
            self.try_scrape_group(group_slug).await,
        )
    }

    async fn try_scrape_group(&self, group_slug: &str) -> Result<ScrapedGroup> {
        let group_url = self.group_url(group_slug)?;
        let page = self.fetch_page(&group_url).await?;

        let upcoming: Vec<EventCard> = (1..=UPCOMING_EVENT_SLOTS).map(EventCard::upcoming).collect();
        let past = EventCard::past(1);
        let cards: Vec<&EventCard> = upcoming.iter().chain([&past]).collect();

        let mut text_selectors = vec![
            group::NAME,
            group::LOCATION,
            group::MEMBER_COUNT,
            group::DESCRIPTION,
        ];
        for card in &cards {
            text_selectors.push(&card.name);
            text_selectors.push(&card.time);
        }
        text_selectors.extend([group::SPONSOR_NAME, group::SPONSOR_DESCRIPTION, group::TOPIC]);

        let mut attribute_selectors = vec![group::FEATURED_IMAGE];
        let mut attribute_names = vec!["src"];
        for card in &cards {
            attribute_selectors.push(&card.card);
            attribute_names.push("href");
        }
        for selector in [
            group::OTHER_LINK,
            group::TWITTER_LINK,
            group::SPONSOR_LINK,
            group::TOPIC,
        ] {
            attribute_selectors.push(selector);
            attribute_names.push("href");
        }

        let text = page.text(&text_selectors, true)?;
        let attributes = page.attributes(&attribute_selectors, &attribute_names)?;

        let name = text.required(group::NAME)?.to_string();
        let (member_count, group_type) = parse_member_line(text.required(group::MEMBER_COUNT)?);

        let upcoming_events = upcoming
            .iter()
            .map(|card| self.event_summary(card, &text, &attributes))
            .collect::<Result<Vec<_>>>()?;
        let past_event = self.event_summary(&past, &text, &attributes)?;

        Ok(ScrapedGroup {
            slug: group_slug.to_string(),
            href: group_url.to_string(),
            name,
            location: text.first_or_empty(group::LOCATION),
            member_count,
            group_type,
            description: text.first_or_empty(group::DESCRIPTION),
            featured_image: attributes.first_or_empty(group::FEATURED_IMAGE),
            other_link: attributes.first_or_empty(group::OTHER_LINK),
            twitter_link: attributes.first_or_empty(group::TWITTER_LINK),
            upcoming_events,
            past_event,
            sponsors: zip_sponsors(
                text.get(group::SPONSOR_NAME),
                text.get(group::SPONSOR_DESCRIPTION),
                attributes.get(group::SPONSOR_LINK),
            ),
            topics: zip_topics(text.get(group::TOPIC), attributes.get(group::TOPIC)),
        })
    }

    /// Summary of one event card; absent cards give an empty summary.
    fn event_summary(
        &self,
        card: &EventCard,
        text: &SelectorMatchSet,
        attributes: &AttributeMatchSet,
    ) -> Result<EventSummary> {
        let href = attributes.first_or_empty(&card.card);
        let date = match text.first(&card.time) {
            Some(time) => local_to_iso(strip_card_zone(time), self.timezone())?,
            None => String::new(),
        };

        Ok(EventSummary {
            id: url_segment(&href, EVENT_ID_SEGMENT)
                .unwrap_or_default()
                .to_string(),
            name: text.first_or_empty(&card.name),
            href,
            date,
        })
    }
}

/// Split `"1,234 members · Public group"` into a count and a group type.
fn parse_member_line(line: &str) -> (u64, String) {
    let mut parts = line.split('·');

    let member_count = parts
        .next()
        .map(|count| count.replacen(" members", "", 1).replace(',', ""))
        .and_then(|count| count.trim().parse().ok())
        .unwrap_or(0);

    let group_type = parts
        .next()
        .map(|kind| kind.replacen("group", "", 1).trim().to_string())
        .unwrap_or_default();

    (member_count, group_type)
}

/// Pair sponsor names, descriptions and links by position.
fn zip_sponsors(names: &[String], descriptions: &[String], links: &[String]) -> Vec<Sponsor> {
    let names = dedup_preserving_order(names.to_vec());
    let descriptions = dedup_preserving_order(descriptions.to_vec());

    names
        .into_iter()
        .enumerate()
        .map(|(index, name)| Sponsor {
            name,
            description: descriptions.get(index).cloned().unwrap_or_default(),
            href: links.get(index).cloned().unwrap_or_default(),
        })
        .collect()
}

fn zip_topics(names: &[String], links: &[String]) -> Vec<Topic> {
    names
        .iter()
        .enumerate()
        .map(|(index, name)| Topic {
            name: name.replace("&amp;", "&"),
            href: links.get(index).cloned().unwrap_or_default(),
        })
        .collect()
}
