//! Feed data model and item construction rules.
//!
//! Items never carry a date scraped from the page: the upstream markup
//! only shows relative strings ("3d ago") which cannot be turned into a
//! trustworthy timestamp, so `published_at` is always the run time.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use chrono::{DateTime, Utc};

use crate::config::FeedConfig;
use crate::extract::Extracted;

/// Title cap in characters, before the ellipsis marker.
pub const TITLE_MAX_CHARS: usize = 100;
/// Leading characters fingerprinted into the guid.
const GUID_FINGERPRINT_CHARS: usize = 50;

/// One `<item>` in the output document.
#[derive(Debug, Clone)]
pub struct FeedItem {
    pub title: String,
    pub link: String,
    pub guid: String,
    pub published_at: DateTime<Utc>,
    pub description: String,
}

/// The whole RSS channel.
#[derive(Debug, Clone)]
pub struct Feed {
    pub title: String,
    pub link: String,
    pub description: String,
    pub last_build_date: DateTime<Utc>,
    pub items: Vec<FeedItem>,
}

impl FeedItem {
    /// Build an item from one extracted post text.
    pub fn from_extracted(config: &FeedConfig, extracted: &Extracted, now: DateTime<Utc>) -> Self {
        Self {
            title: truncate_title(&extracted.text),
            link: config.page_url.to_string(),
            guid: fingerprint_guid(extracted.index, &extracted.text),
            published_at: now,
            description: extracted.text.clone(),
        }
    }
}

impl Feed {
    /// Normal-state feed: one item per extracted text, extraction order
    /// preserved.
    pub fn from_texts(config: &FeedConfig, texts: &[Extracted], now: DateTime<Utc>) -> Self {
        let items = texts
            .iter()
            .map(|t| FeedItem::from_extracted(config, t, now))
            .collect();
        Self::with_items(config, items, now)
    }

    /// Feed around pre-built items. The fallback states use this.
    pub fn with_items(config: &FeedConfig, items: Vec<FeedItem>, now: DateTime<Utc>) -> Self {
        Self {
            title: config.channel_title.clone(),
            link: config.page_url.to_string(),
            description: config.channel_description.clone(),
            last_build_date: now,
            items,
        }
    }
}

/// First 100 characters of `text`, with `...` appended when the original
/// exceeded the cap. Operates on characters, never mid-code-point.
pub fn truncate_title(text: &str) -> String {
    let mut title: String = text.chars().take(TITLE_MAX_CHARS).collect();
    if text.chars().count() > TITLE_MAX_CHARS {
        title.push_str("...");
    }
    title
}

/// Deterministic per-run guid: base64 of the item index plus a content
/// fingerprint. Repeated runs over unchanged content produce identical
/// guids, so downstream consumers can deduplicate.
pub fn fingerprint_guid(index: usize, text: &str) -> String {
    let prefix: String = text.chars().take(GUID_FINGERPRINT_CHARS).collect();
    BASE64.encode(format!("{index}-{prefix}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FeedConfig;

    fn config() -> FeedConfig {
        FeedConfig::new("https://example.com/company/acme").unwrap()
    }

    #[test]
    fn short_titles_pass_through_without_ellipsis() {
        assert_eq!(truncate_title("A short post"), "A short post");
    }

    #[test]
    fn exactly_one_hundred_chars_is_not_truncated() {
        let text = "x".repeat(100);
        assert_eq!(truncate_title(&text), text);
    }

    #[test]
    fn long_titles_are_capped_at_one_hundred_plus_ellipsis() {
        let text = "y".repeat(150);
        let title = truncate_title(&text);
        assert_eq!(title.chars().count(), 103);
        assert!(title.ends_with("..."));
        assert!(title.starts_with(&"y".repeat(100)));
    }

    #[test]
    fn truncation_respects_multibyte_boundaries() {
        let text = "é".repeat(120);
        let title = truncate_title(&text);
        assert_eq!(title.chars().count(), 103);
        assert!(title.ends_with("..."));
    }

    #[test]
    fn guids_are_deterministic_across_runs() {
        let a = fingerprint_guid(3, "the same content");
        let b = fingerprint_guid(3, "the same content");
        assert_eq!(a, b);
    }

    #[test]
    fn guids_differ_by_index_for_identical_texts() {
        let a = fingerprint_guid(0, "duplicate post");
        let b = fingerprint_guid(1, "duplicate post");
        assert_ne!(a, b);
    }

    #[test]
    fn guid_encodes_index_and_content_prefix() {
        let guid = fingerprint_guid(0, "hello world");
        assert_eq!(guid, BASE64.encode("0-hello world"));
    }

    #[test]
    fn items_keep_extraction_order_and_run_timestamp() {
        let now = Utc::now();
        let texts = vec![
            Extracted {
                index: 0,
                text: "First extracted post body".to_string(),
            },
            Extracted {
                index: 1,
                text: "Second extracted post body".to_string(),
            },
        ];
        let feed = Feed::from_texts(&config(), &texts, now);
        assert_eq!(feed.items.len(), 2);
        assert_eq!(feed.items[0].description, "First extracted post body");
        assert_eq!(feed.items[1].description, "Second extracted post body");
        assert!(feed.items.iter().all(|i| i.published_at == now));
        assert_eq!(feed.last_build_date, now);
    }
}
