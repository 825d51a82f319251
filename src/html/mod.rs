//! Selector-driven HTML extraction.
//!
//! A document is exposed as a push-based stream of [`ScanEvent`]s, one
//! element-matched event per matching element and one text event per text
//! node below a matched element, dispatched per registered selector in
//! document order. Text and attribute extraction are both consumers of that
//! stream.

mod attributes;
mod stream;

pub use attributes::{extract_attribute, normalize_attribute};
pub use stream::{MatchedElement, ScanEvent, TextAccumulator, extract_text, scan};

use scraper::Selector;

use crate::error::{AppError, Result};

/// Parse a CSS selector, keeping the source text in the error.
pub fn parse_selector(s: &str) -> Result<Selector> {
    Selector::parse(s).map_err(|e| AppError::selector(s, format!("{e:?}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_selector_valid() {
        assert!(parse_selector("div.break-words").is_ok());
        assert!(parse_selector("a[data-event-label=\"topic-link\"]").is_ok());
        assert!(parse_selector("#event-info > div > div:nth-child(1)").is_ok());
    }

    #[test]
    fn test_parse_selector_invalid() {
        assert!(matches!(
            parse_selector("[[invalid"),
            Err(AppError::Selector { .. })
        ));
    }
}
