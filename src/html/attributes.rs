//! Attribute harvesting.

use scraper::Html;

use crate::error::Result;
use crate::html::{ScanEvent, parse_selector, scan};

/// Canonical form of a harvested attribute value: trimmed and lower-cased.
pub fn normalize_attribute(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Values of `attribute` on every element matching `selector`.
///
/// Values are trimmed and lower-cased; blanks are skipped and duplicates
/// keep their first position.
pub fn extract_attribute(document: &Html, selector: &str, attribute: &str) -> Result<Vec<String>> {
    let parsed = [parse_selector(selector)?];
    let mut values: Vec<String> = Vec::new();

    scan(document, &parsed, |event| {
        if let ScanEvent::ElementMatched { element, .. } = event {
            let Some(raw) = element.attr(attribute) else {
                return;
            };
            let value = normalize_attribute(raw);
            if !value.is_empty() && !values.contains(&value) {
                values.push(value);
            }
        }
    });

    Ok(values)
}
