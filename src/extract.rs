//! CSS-selector based post extractor for raw HTML.
//!
//! The selector list is the fragile part of scraping an uncontrolled page,
//! so it lives in data: an ordered set of strategies embedded at compile
//! time from `strategies.json` via `include_str!`. Each strategy names the
//! selectors for candidate post containers plus narrower selectors for the
//! post text inside a container. Strategies are tried in priority order and
//! the first one that yields a usable candidate supplies the result; later
//! entries are broader nets kept around for upstream markup changes.
//!
//! Everything here is synchronous — the `scraper` crate's types are not
//! `Send`, so callers parse after the fetch has completed.

use scraper::{ElementRef, Html, Selector};
use serde::Deserialize;

use crate::error::{FeedError, FeedResult};

/// Raw JSON content of the built-in strategy list, embedded at compile
/// time so there is no runtime file I/O.
const STRATEGIES_JSON: &str = include_str!("strategies.json");

/// One way of locating post-like fragments in a document.
#[derive(Debug, Clone, Deserialize)]
pub struct Strategy {
    /// Identifies the strategy in logs.
    pub name: String,
    /// Selectors locating candidate post containers. Matched as a single
    /// selector list, so candidates come back in document order and an
    /// element matching several selectors is only seen once.
    pub containers: Vec<String>,
    /// Narrower selectors for the post text inside a container. When any
    /// of these match, their text is preferred over the container's own.
    #[serde(default)]
    pub content: Vec<String>,
}

/// A post fragment pulled out of the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extracted {
    /// Zero-based position among the usable candidates.
    pub index: usize,
    /// Normalized text content.
    pub text: String,
}

/// Strategy-driven extractor.
pub struct Extractor {
    strategies: Vec<Strategy>,
}

impl Extractor {
    /// Extractor with the built-in strategy list.
    pub fn from_embedded() -> FeedResult<Self> {
        let strategies = serde_json::from_str(STRATEGIES_JSON)
            .map_err(|e| FeedError::Parse(format!("embedded strategy config: {e}")))?;
        Ok(Self { strategies })
    }

    /// Extractor with a custom strategy list, highest priority first.
    pub fn with_strategies(strategies: Vec<Strategy>) -> Self {
        Self { strategies }
    }

    /// Pull up to `max_items` usable post texts out of `html`.
    ///
    /// Candidates whose normalized text is empty or shorter than `min_len`
    /// characters are discarded and do not count against the cap.
    pub fn extract(&self, html: &str, max_items: usize, min_len: usize) -> Vec<Extracted> {
        let document = Html::parse_document(html);

        for strategy in &self.strategies {
            let found = apply_strategy(&document, strategy, max_items, min_len);
            if found.is_empty() {
                tracing::debug!(strategy = %strategy.name, "strategy yielded nothing");
                continue;
            }
            tracing::debug!(
                strategy = %strategy.name,
                count = found.len(),
                "strategy matched"
            );
            return found;
        }

        Vec::new()
    }
}

fn apply_strategy(
    document: &Html,
    strategy: &Strategy,
    max_items: usize,
    min_len: usize,
) -> Vec<Extracted> {
    let Some(containers) = parse_selector_list(&strategy.containers, &strategy.name) else {
        return Vec::new();
    };
    let content = if strategy.content.is_empty() {
        None
    } else {
        parse_selector_list(&strategy.content, &strategy.name)
    };

    let mut found = Vec::new();
    for element in document.select(&containers) {
        if found.len() >= max_items {
            break;
        }
        let text = candidate_text(element, content.as_ref());
        if text.is_empty() || text.chars().count() < min_len {
            continue;
        }
        found.push(Extracted {
            index: found.len(),
            text,
        });
    }
    found
}

/// Join selectors into one selector list and compile it. An invalid
/// selector disables the whole strategy with a warning rather than a panic.
fn parse_selector_list(selectors: &[String], strategy: &str) -> Option<Selector> {
    let joined = selectors.join(", ");
    let parsed = Selector::parse(&joined);
    match parsed {
        Ok(selector) => Some(selector),
        Err(e) => {
            tracing::warn!(strategy, selector = %joined, error = ?e, "invalid selector, skipping");
            None
        }
    }
}

/// Text for one candidate container. A matching content sub-selector wins
/// over the container's own text.
fn candidate_text(element: ElementRef, content: Option<&Selector>) -> String {
    if let Some(selector) = content {
        let text = normalize(element.select(selector).flat_map(|el| el.text()));
        if !text.is_empty() {
            return text;
        }
    }
    normalize(element.text())
}

/// Collapse runs of whitespace. Scraped markup indents heavily and splits
/// text across inline elements.
fn normalize<'a, I: Iterator<Item = &'a str>>(parts: I) -> String {
    let words: Vec<&str> = parts.flat_map(str::split_whitespace).collect();
    words.join(" ")
}
