//! Streaming text extraction.

use scraper::node::{Element, Node};
use scraper::{ElementRef, Html, Selector};

use crate::error::Result;
use crate::html::parse_selector;
use crate::models::SelectorMatchSet;
use crate::utils::normalize_whitespace;

/// An element that matched a registered selector.
#[derive(Debug, Clone, Copy)]
pub struct MatchedElement<'a> {
    element: &'a Element,
}

impl<'a> MatchedElement<'a> {
    pub fn name(&self) -> &'a str {
        self.element.name()
    }

    pub fn attr(&self, name: &str) -> Option<&'a str> {
        self.element.attr(name)
    }
}

/// One step of a document scan, addressed to a selector by index.
#[derive(Debug, Clone, Copy)]
pub enum ScanEvent<'a> {
    /// An element matching the selector was opened.
    ElementMatched {
        selector: usize,
        element: MatchedElement<'a>,
    },
    /// A run of text inside an element matching the selector.
    Text {
        selector: usize,
        chunk: &'a str,
        last_in_text_node: bool,
    },
}

/// Drive `on_event` over the whole document in document order.
///
/// Text nested below several matches of the same selector is reported once
/// for that selector.
pub fn scan<'a, F>(document: &'a Html, selectors: &[Selector], mut on_event: F)
where
    F: FnMut(ScanEvent<'a>),
{
    for node in document.root_element().descendants() {
        match node.value() {
            Node::Element(element) => {
                let Some(element_ref) = ElementRef::wrap(node) else {
                    continue;
                };
                for (index, selector) in selectors.iter().enumerate() {
                    if selector.matches(&element_ref) {
                        on_event(ScanEvent::ElementMatched {
                            selector: index,
                            element: MatchedElement { element },
                        });
                    }
                }
            }
            Node::Text(text) => {
                let ancestors: Vec<ElementRef<'a>> =
                    node.ancestors().filter_map(ElementRef::wrap).collect();
                if ancestors.is_empty() {
                    continue;
                }
                let chunk: &'a str = text;
                for (index, selector) in selectors.iter().enumerate() {
                    if ancestors.iter().any(|el| selector.matches(el)) {
                        on_event(ScanEvent::Text {
                            selector: index,
                            chunk,
                            last_in_text_node: true,
                        });
                    }
                }
            }
            _ => {}
        }
    }
}

/// Collects the text of consecutive matches of one selector into blocks.
///
/// Chunks of one text node gather in a pending run that joins the current
/// block when the node ends. A new matched element closes the current block.
#[derive(Debug, Default)]
pub struct TextAccumulator {
    spaced: bool,
    run: String,
    block: String,
    blocks: Vec<String>,
}

impl TextAccumulator {
    pub fn new(spaced: bool) -> Self {
        Self {
            spaced,
            ..Self::default()
        }
    }

    /// A matched element opened: close whatever came before it.
    pub fn element_opened(&mut self) {
        self.flush();
    }

    pub fn push_text(&mut self, chunk: &str, last_in_text_node: bool) {
        if self.spaced {
            self.run.push(' ');
            self.run.push_str(chunk);
            self.run.push(' ');
        } else {
            self.run.push_str(chunk);
        }

        if last_in_text_node {
            self.block.push_str(&self.run);
            self.run.clear();
        }
    }

    fn flush(&mut self) {
        self.block.push_str(&self.run);
        self.run.clear();

        let text = normalize_whitespace(&self.block);
        self.block.clear();
        if !text.is_empty() {
            self.blocks.push(text);
        }
    }

    /// Close the trailing block and return all non-blank blocks.
    pub fn finish(mut self) -> Vec<String> {
        self.flush();
        self.blocks
    }
}

/// Run one pass over `document` collecting text blocks for every selector.
///
/// Every requested selector is present in the result, with an empty
/// sequence when nothing matched.
pub fn extract_text(document: &Html, selectors: &[&str], spaced: bool) -> Result<SelectorMatchSet> {
    let parsed = selectors
        .iter()
        .map(|s| parse_selector(s))
        .collect::<Result<Vec<_>>>()?;

    let mut accumulators: Vec<TextAccumulator> =
        selectors.iter().map(|_| TextAccumulator::new(spaced)).collect();

    scan(document, &parsed, |event| match event {
        ScanEvent::ElementMatched { selector, .. } => accumulators[selector].element_opened(),
        ScanEvent::Text {
            selector,
            chunk,
            last_in_text_node,
        } => accumulators[selector].push_text(chunk, last_in_text_node),
    });

    let mut result = SelectorMatchSet::new();
    for (selector, accumulator) in selectors.iter().zip(accumulators) {
        result.insert(*selector, accumulator.finish());
    }
    Ok(result)
}

/// Single-selector convenience returning the bare block sequence.
#[cfg(test)]
fn extract_text_single(document: &Html, selector: &str, spaced: bool) -> Result<Vec<String>> {
    let mut result = extract_text(document, &[selector], spaced)?;
    Ok(result.take(selector))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(html: &str) -> Html {
        Html::parse_document(html)
    }

    #[test]
    fn test_zero_matches_is_empty_sequence() {
        let result = extract_text(&doc("<p>hi</p>"), &["h1", "p"], false).unwrap();
        assert!(result.contains("h1"));
        assert!(result.get("h1").is_empty());
        assert_eq!(result.get("p"), ["hi"]);
    }

    #[test]
    fn test_sibling_occurrences_are_separate_blocks() {
        let html = "<ul><li>One</li><li>Two</li><li>Three</li></ul>";
        let blocks = extract_text_single(&doc(html), "li", false).unwrap();
        assert_eq!(blocks, vec!["One", "Two", "Three"]);
    }

    #[test]
    fn test_nested_text_nodes_coalesce() {
        let html = "<div class=\"d\">Hello <b>big</b>\n   world</div><div class=\"d\">again</div>";
        let blocks = extract_text_single(&doc(html), "div.d", false).unwrap();
        assert_eq!(blocks, vec!["Hello big world", "again"]);
    }

    #[test]
    fn test_whitespace_only_blocks_dropped() {
        let html = "<span> </span><span>\n\t</span><span>x</span>";
        let blocks = extract_text_single(&doc(html), "span", false).unwrap();
        assert_eq!(blocks, vec!["x"]);
    }

    #[test]
    fn test_spaced_separates_fragments() {
        let html = "<p>Rust<b>Meetup</b>Night</p>";
        assert_eq!(
            extract_text_single(&doc(html), "p", false).unwrap(),
            vec!["RustMeetupNight"]
        );
        assert_eq!(
            extract_text_single(&doc(html), "p", true).unwrap(),
            vec!["Rust Meetup Night"]
        );
    }

    #[test]
    fn test_no_double_spaces_survive() {
        let html = "<p>  a   lot\n\n of    space  </p><p>b <i> c </i></p>";
        let result = extract_text(&doc(html), &["p"], true).unwrap();
        for block in result.get("p") {
            assert!(!block.contains("  "), "block {block:?}");
        }
        assert_eq!(result.get("p"), ["a lot of space", "b c"]);
    }

    #[test]
    fn test_single_pass_fans_out() {
        let html = "<title>T | Meetup</title><h1>Name</h1><time>Now</time>";
        let result = extract_text(&doc(html), &["title", "h1", "time"], true).unwrap();
        assert_eq!(result.len(), 3);
        assert_eq!(result.first("title"), Some("T | Meetup"));
        assert_eq!(result.first("h1"), Some("Name"));
        assert_eq!(result.first("time"), Some("Now"));
    }

    #[test]
    fn test_scan_reports_matches_and_text() {
        let document = doc("<a id=\"x\" href=\"/e/1\">go</a>");
        let selectors = vec![parse_selector("a").unwrap()];
        let mut opened = Vec::new();
        let mut texts = Vec::new();
        scan(&document, &selectors, |event| match event {
            ScanEvent::ElementMatched { element, .. } => {
                opened.push((element.name().to_string(), element.attr("href").map(String::from)))
            }
            ScanEvent::Text { chunk, last_in_text_node, .. } => {
                texts.push((chunk.to_string(), last_in_text_node))
            }
        });
        assert_eq!(opened, vec![("a".to_string(), Some("/e/1".to_string()))]);
        assert_eq!(texts, vec![("go".to_string(), true)]);
    }

    #[test]
    fn test_accumulator_run_boundaries() {
        let mut acc = TextAccumulator::new(false);
        acc.element_opened();
        acc.push_text("Hel", false);
        acc.push_text("lo", true);
        acc.push_text(" there", true);
        acc.element_opened();
        acc.push_text("  ", true);
        acc.element_opened();
        acc.push_text("tail", false);
        assert_eq!(acc.finish(), vec!["Hello there", "tail"]);
    }

    #[test]
    fn test_invalid_selector_fails_pass() {
        assert!(extract_text(&doc("<p/>"), &["p", "[[bad"], false).is_err());
    }
}
