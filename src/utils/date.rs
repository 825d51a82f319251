// src/utils/date.rs

//! Local date parsing for the dates the source site renders.
//!
//! The site prints wall-clock times without an offset ("Wed, Oct 18, 2023,
//! 6:00 PM"); the offset comes from configuration as a timezone name.

use chrono::{DateTime, FixedOffset, NaiveDateTime, SecondsFormat, TimeZone, Utc};

use crate::error::{AppError, Result};

/// Suffix the source site appends to every page title.
pub const TITLE_SUFFIX: &str = " | Meetup";

/// Number of trailing comma-separated title segments that hold the date.
const TITLE_DATE_SEGMENTS: usize = 4;

/// Length of the timezone abbreviation ending an event card time (" EDT").
const CARD_ZONE_SUFFIX_LEN: usize = 4;

const FORMATS: &[&str] = &[
    "%a, %b %d, %Y, %I:%M %p",
    "%A, %B %d, %Y, %I:%M %p",
    "%a, %b %d, %Y %I:%M %p",
    "%b %d, %Y, %I:%M %p",
    "%B %d, %Y, %I:%M %p",
    "%Y-%m-%d %H:%M",
];

/// Resolve a timezone name into a fixed UTC offset.
///
/// Accepts common abbreviations and numeric offsets such as `+05:30`,
/// `-0500` or `UTC+2`.
pub fn resolve_timezone(name: &str) -> Option<FixedOffset> {
    let name = name.trim().to_uppercase();
    let hours = match name.as_str() {
        "UTC" | "GMT" | "Z" | "UT" => Some(0),
        "EST" => Some(-5),
        "EDT" => Some(-4),
        "CST" => Some(-6),
        "CDT" => Some(-5),
        "MST" => Some(-7),
        "MDT" => Some(-6),
        "PST" => Some(-8),
        "PDT" => Some(-7),
        "AKST" => Some(-9),
        "AKDT" => Some(-8),
        "HST" => Some(-10),
        "BST" | "CET" | "WEST" => Some(1),
        "CEST" | "EET" => Some(2),
        "EEST" | "MSK" => Some(3),
        "JST" | "KST" => Some(9),
        "AEST" => Some(10),
        "AEDT" => Some(11),
        _ => None,
    };

    if let Some(hours) = hours {
        return FixedOffset::east_opt(hours * 3600);
    }

    let numeric = name
        .strip_prefix("UTC")
        .or_else(|| name.strip_prefix("GMT"))
        .unwrap_or(&name);
    parse_numeric_offset(numeric)
}

fn parse_numeric_offset(text: &str) -> Option<FixedOffset> {
    let (sign, rest) = match text.chars().next()? {
        '+' => (1, &text[1..]),
        '-' => (-1, &text[1..]),
        _ => return None,
    };

    let (hours, minutes) = match rest.split_once(':') {
        Some((h, m)) => (h, m),
        None if rest.len() == 4 => rest.split_at(2),
        None => (rest, "0"),
    };

    let hours: i32 = hours.parse().ok()?;
    let minutes: i32 = minutes.parse().ok()?;
    if hours > 14 || minutes > 59 {
        return None;
    }
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

/// Keep the date fragment at the end of a page title.
///
/// Strips the site suffix, then keeps the last four comma-separated
/// segments. Titles with fewer segments are returned whole.
pub fn title_date_fragment(title: &str) -> String {
    let title = title.replacen(TITLE_SUFFIX, "", 1);
    let parts: Vec<&str> = title.trim().split(',').collect();
    let start = parts.len().saturating_sub(TITLE_DATE_SEGMENTS);
    parts[start..].join(",").trim().to_string()
}

/// Drop the trailing timezone abbreviation from an event card time.
pub fn strip_card_zone(text: &str) -> &str {
    let text = text.trim();
    let cut = text
        .char_indices()
        .rev()
        .nth(CARD_ZONE_SUFFIX_LEN - 1)
        .map(|(index, _)| index)
        .unwrap_or(0);
    &text[..cut]
}

/// Parse a wall-clock date rendered in the given offset.
pub fn parse_local(text: &str, offset: FixedOffset) -> Result<DateTime<Utc>> {
    let cleaned = text
        .replace('·', ",")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .replace(" ,", ",");

    let naive = FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(&cleaned, format).ok())
        .ok_or_else(|| AppError::Date(text.to_string()))?;

    offset
        .from_local_datetime(&naive)
        .single()
        .map(|local| local.with_timezone(&Utc))
        .ok_or_else(|| AppError::Date(text.to_string()))
}

/// Render an instant the way JavaScript's `toISOString` does.
pub fn to_iso(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parse and render in one step.
pub fn local_to_iso(text: &str, offset: FixedOffset) -> Result<String> {
    parse_local(text, offset).map(to_iso)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn est() -> FixedOffset {
        resolve_timezone("EST").unwrap()
    }

    #[test]
    fn test_resolve_abbreviations() {
        assert_eq!(est().local_minus_utc(), -5 * 3600);
        assert_eq!(resolve_timezone("pdt").unwrap().local_minus_utc(), -7 * 3600);
        assert_eq!(resolve_timezone("UTC").unwrap().local_minus_utc(), 0);
        assert!(resolve_timezone("XYZ").is_none());
    }

    #[test]
    fn test_resolve_numeric_offsets() {
        assert_eq!(
            resolve_timezone("+05:30").unwrap().local_minus_utc(),
            5 * 3600 + 30 * 60
        );
        assert_eq!(resolve_timezone("-0500").unwrap().local_minus_utc(), -5 * 3600);
        assert_eq!(resolve_timezone("UTC+2").unwrap().local_minus_utc(), 2 * 3600);
        assert!(resolve_timezone("+25").is_none());
    }

    #[test]
    fn test_title_keeps_last_four_segments() {
        assert_eq!(
            title_date_fragment("X, Y, Z, W, Extra | Meetup"),
            "Y, Z, W, Extra"
        );
        assert_eq!(
            title_date_fragment("Rust Night, Wed, Oct 18, 2023, 6:00 PM | Meetup"),
            "Wed, Oct 18, 2023, 6:00 PM"
        );
    }

    #[test]
    fn test_short_title_is_kept() {
        assert_eq!(title_date_fragment("A, B, C | Meetup"), "A, B, C");
        assert_eq!(title_date_fragment("  Solo  "), "Solo");
    }

    #[test]
    fn test_parse_title_date_in_est() {
        let iso = local_to_iso("Wed, Oct 18, 2023, 6:00 PM", est()).unwrap();
        assert_eq!(iso, "2023-10-18T23:00:00.000Z");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!(
            parse_local("sometime next week", est()),
            Err(AppError::Date(_))
        ));
        assert!(parse_local("", est()).is_err());
    }

    #[test]
    fn test_parse_rejects_wrong_weekday() {
        assert!(parse_local("Mon, Oct 18, 2023, 6:00 PM", est()).is_err());
    }

    #[test]
    fn test_card_time() {
        let stripped = strip_card_zone("Thu, Nov 16, 2023, 6:30 PM EST ");
        assert_eq!(stripped, "Thu, Nov 16, 2023, 6:30 PM");
        assert_eq!(
            local_to_iso(stripped, est()).unwrap(),
            "2023-11-16T23:30:00.000Z"
        );
        assert_eq!(strip_card_zone("EST"), "");
    }

    #[test]
    fn test_middle_dot_separator() {
        let iso = local_to_iso("Thu, Nov 16, 2023 · 6:30 PM", est()).unwrap();
        assert_eq!(iso, "2023-11-16T23:30:00.000Z");
    }
}
