//! Selector match sets produced by the extraction passes.

use std::collections::HashMap;

use crate::error::{AppError, Result};

/// Values harvested per selector, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchSet {
    values: HashMap<String, Vec<String>>,
}

/// Coalesced text blocks per selector.
pub type SelectorMatchSet = MatchSet;

/// Deduplicated attribute values per selector.
pub type AttributeMatchSet = MatchSet;

impl MatchSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, selector: impl Into<String>, values: Vec<String>) {
        self.values.insert(selector.into(), values);
    }

    /// Values for a selector; unknown selectors yield an empty slice.
    pub fn get(&self, selector: &str) -> &[String] {
        self.values.get(selector).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains(&self, selector: &str) -> bool {
        self.values.contains_key(selector)
    }

    pub fn first(&self, selector: &str) -> Option<&str> {
        self.get(selector).first().map(String::as_str)
    }

    /// First value, or an empty string when the selector matched nothing.
    pub fn first_or_empty(&self, selector: &str) -> String {
        self.first(selector).unwrap_or_default().to_string()
    }

    /// First value of a selector the record cannot be built without.
    pub fn required(&self, selector: &str) -> Result<&str> {
        self.first(selector)
            .ok_or_else(|| AppError::not_found(format!("selector '{selector}' matched nothing")))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Take the values of one selector, leaving nothing behind.
    pub fn take(&mut self, selector: &str) -> Vec<String> {
        self.values.remove(selector).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_selector_is_empty() {
        let set = MatchSet::new();
        assert!(set.get("h1").is_empty());
        assert_eq!(set.first_or_empty("h1"), "");
        assert!(matches!(set.required("h1"), Err(AppError::NotFound(_))));
    }

    #[test]
    fn test_first_value() {
        let mut set = MatchSet::new();
        set.insert("h1", vec!["One".to_string(), "Two".to_string()]);
        assert!(set.contains("h1"));
        assert_eq!(set.first("h1"), Some("One"));
        assert_eq!(set.required("h1").unwrap(), "One");
        assert_eq!(set.take("h1").len(), 2);
        assert!(set.is_empty());
    }
}
