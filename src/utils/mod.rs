//! Utility functions and helpers.

pub mod date;
pub mod http;

use regex::Regex;
use unicode_segmentation::UnicodeSegmentation;

/// Collapse every run of whitespace into a single space and trim.
pub fn normalize_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// First capture group of `pattern` in `html`, or an empty string.
pub fn text_from_html(html: &str, pattern: &Regex) -> String {
    pattern
        .captures(html)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}

/// Path component at `index` of a `/`-split URL string.
///
/// Index 5 of `https://host/group/events/123/` is the event id.
pub fn url_segment(url: &str, index: usize) -> Option<&str> {
    url.split('/').nth(index).filter(|segment| !segment.is_empty())
}

/// Order-preserving deduplication.
pub fn dedup_preserving_order(values: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    values
        .into_iter()
        .filter(|value| seen.insert(value.clone()))
        .collect()
}

/// Shorten text for log output without splitting graphemes.
pub fn preview(text: &str, max_graphemes: usize) -> String {
    let mut graphemes = text.graphemes(true);
    let head: String = graphemes.by_ref().take(max_graphemes).collect();
    if graphemes.next().is_some() {
        format!("{head}…")
    } else {
        head
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_whitespace() {
        assert_eq!(normalize_whitespace("  a \n\t b   c "), "a b c");
        assert_eq!(normalize_whitespace(" \n "), "");
    }

    #[test]
    fn test_text_from_html() {
        let h1 = Regex::new(r"<h1>([^<]*)</h1>").unwrap();
        assert_eq!(text_from_html("<h1>Nix Rules</h1>", &h1), "Nix Rules");

        let h2 = Regex::new(r"<h2>([^<]*)</h2>").unwrap();
        assert_eq!(text_from_html("<h1>Nix Rules</h1>", &h2), "");
    }

    #[test]
    fn test_url_segment() {
        let href = "https://www.meetup.com/tridev/events/296383512/";
        assert_eq!(url_segment(href, 5), Some("296383512"));
        assert_eq!(url_segment(href, 3), Some("tridev"));
        assert_eq!(url_segment(href, 6), None);
        assert_eq!(url_segment("https://www.meetup.com/tridev/", 5), None);
    }

    #[test]
    fn test_dedup_preserving_order() {
        let values = vec!["b", "a", "b", "c", "a"]
            .into_iter()
            .map(String::from)
            .collect();
        assert_eq!(dedup_preserving_order(values), vec!["b", "a", "c"]);
    }

    #[test]
    fn test_preview() {
        assert_eq!(preview("short", 10), "short");
        assert_eq!(preview("abcdef", 3), "abc…");
        assert_eq!(preview("e\u{301}e\u{301}e\u{301}", 2), "e\u{301}e\u{301}…");
    }
}
