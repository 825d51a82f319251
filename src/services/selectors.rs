//! CSS selectors for Meetup pages.
//!
//! Update this file when Meetup changes their markup.

/// Event detail page.
pub mod event {
    pub const NAME: &str = "h1";
    pub const TITLE: &str = "title";
    pub const DESCRIPTION: &str = "div.break-words";
    pub const GROUP_NAME: &str =
        "#event-group-link > div > div.ml-4 > div.text-sm.font-medium.leading-5";
    pub const GROUP_TYPE: &str = "#event-group-link > div > div.ml-4 > div.flex.flex-row.text-gray6.text-sm.mt-1.h-5 > span > span";
    pub const LOCATION: &str =
        "#event-info > div > div:nth-child(1) > div.flex.flex-col > div > div.overflow-hidden > div";
    pub const FEATURED_IMAGE: &str =
        "#main > div > div > div > div > div > div > div:nth-child(1) > picture > div > img";

    pub const TEXT: &[&str] = &[
        NAME,
        TITLE,
        DESCRIPTION,
        GROUP_NAME,
        GROUP_TYPE,
        LOCATION,
    ];
}

/// Group home page.
pub mod group {
    pub const NAME: &str = "h1";
    pub const LOCATION: &str = "#city-link > div";
    pub const MEMBER_COUNT: &str = "#member-count-link > div";
    pub const DESCRIPTION: &str =
        "#submain > div > div > div.w-full > div.relative.overflow-hidden.h-auto";
    pub const SPONSOR_NAME: &str = "li.swiper-slide > a > div.w-full > div.break-words.font-medium";
    pub const SPONSOR_DESCRIPTION: &str = "li.swiper-slide > a > div.w-full > div.text-sm";
    pub const TOPIC: &str = r#"a[data-event-label="topic-link"]"#;

    pub const FEATURED_IMAGE: &str = "#main > div:nth-child(2) > section > div.relative > img";
    pub const OTHER_LINK: &str = r#"a[data-event-label="group-other-button"]"#;
    pub const TWITTER_LINK: &str = r#"a[data-event-label="group-twitter-button"]"#;
    pub const SPONSOR_LINK: &str = r#"a[data-event-label="sponsor-group-home-button"]"#;

    /// First upcoming event card, whose link leads to the latest event.
    pub const FIRST_EVENT_LINK: &str = "a#event-card-e-1";

    /// Selectors addressing one event card on the group page.
    #[derive(Debug, Clone)]
    pub struct EventCard {
        pub card: String,
        pub name: String,
        pub time: String,
    }

    impl EventCard {
        fn new(card_id: String) -> Self {
            Self {
                name: format!("{card_id} > div > div > div > span"),
                time: format!("{card_id} > div > div > div > time"),
                card: card_id,
            }
        }

        /// Upcoming card at a 1-based position.
        pub fn upcoming(position: usize) -> Self {
            Self::new(format!("#event-card-e-{position}"))
        }

        /// Past card at a 1-based position.
        pub fn past(position: usize) -> Self {
            Self::new(format!("#past-event-card-ep-{position}"))
        }
    }
}
