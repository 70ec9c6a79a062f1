//! Pipeline orchestration and the fallback policy.
//!
//! A run always ends with a feed file on disk. The downstream automation
//! trigger expects the file to exist after every scheduled run, so every
//! failure upstream of the final write is folded into the document itself:
//!
//! - **Normal** — the extractor found usable posts; they become the items.
//! - **Empty-result** — fetch and parse succeeded but nothing matched; one
//!   placeholder item with a stable guid explains the situation.
//! - **Failure** — the fetch (or extractor setup) errored; one item
//!   reports the error kind and message.
//! - **Heartbeat** — scraping disabled by configuration; one synthetic
//!   item proves the pipeline is alive.
//!
//! Only a failure of the final write itself escapes this function.

use std::fs;
use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::config::FeedConfig;
use crate::error::{FeedError, FeedResult};
use crate::extract::{Extracted, Extractor};
use crate::feed::{Feed, FeedItem};
use crate::fetch::HttpFetcher;
use crate::rss;

/// Stable guid for the empty-result placeholder item.
pub const NO_CONTENT_GUID: &str = "no-content-1";

/// Which terminal state a run ended in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Normal,
    EmptyResult,
    FetchFailed,
    Heartbeat,
}

/// Summary of one completed run.
#[derive(Debug)]
pub struct RunReport {
    pub outcome: Outcome,
    pub item_count: usize,
}

/// Execute one scrape-to-feed run and write the output file.
pub async fn run(config: &FeedConfig) -> FeedResult<RunReport> {
    let now = Utc::now();

    let (feed, outcome) = if config.heartbeat {
        tracing::info!("heartbeat mode, skipping scrape");
        (heartbeat_feed(config, now), Outcome::Heartbeat)
    } else {
        match scrape(config).await {
            Ok(texts) if texts.is_empty() => {
                tracing::warn!("no posts extracted, emitting placeholder feed");
                (empty_result_feed(config, now), Outcome::EmptyResult)
            }
            Ok(texts) => {
                tracing::info!(count = texts.len(), "posts extracted");
                (Feed::from_texts(config, &texts, now), Outcome::Normal)
            }
            Err(err) => {
                tracing::warn!(error = %err, "scrape failed, emitting error feed");
                (failure_feed(config, &err, now), Outcome::FetchFailed)
            }
        }
    };

    let item_count = feed.items.len();
    let xml = rss::write_rss(&feed)?;
    fs::write(&config.output_path, xml)?;

    tracing::info!(
        path = %config.output_path.display(),
        items = item_count,
        outcome = ?outcome,
        "feed written"
    );

    Ok(RunReport {
        outcome,
        item_count,
    })
}

/// Fetch the page and extract post texts. Any error here is consumed by
/// the caller's fallback handling, never propagated past it.
async fn scrape(config: &FeedConfig) -> FeedResult<Vec<Extracted>> {
    let fetcher = HttpFetcher::new(Duration::from_secs(config.timeout_secs))?;
    let html = fetcher.fetch_page(config.page_url.as_str()).await?;
    let extractor = Extractor::from_embedded()?;
    Ok(extractor.extract(&html, config.max_items, config.min_text_len))
}

fn empty_result_feed(config: &FeedConfig, now: DateTime<Utc>) -> Feed {
    let item = FeedItem {
        title: "No posts found".to_string(),
        link: config.page_url.to_string(),
        guid: NO_CONTENT_GUID.to_string(),
        published_at: now,
        description: format!(
            "No posts could be extracted from {}. The source may be blocking \
             automated requests, or its markup may have changed.",
            config.page_url
        ),
    };
    Feed::with_items(config, vec![item], now)
}

fn failure_feed(config: &FeedConfig, err: &FeedError, now: DateTime<Utc>) -> Feed {
    let item = FeedItem {
        title: format!("Feed generation failed ({} error)", err.kind()),
        link: config.page_url.to_string(),
        guid: format!("error-{}", now.timestamp()),
        published_at: now,
        description: format!("The page could not be scraped: {err}"),
    };
    Feed::with_items(config, vec![item], now)
}

fn heartbeat_feed(config: &FeedConfig, now: DateTime<Utc>) -> Feed {
    let item = FeedItem {
        title: "Feed pipeline heartbeat".to_string(),
        link: config.page_url.to_string(),
        guid: format!("heartbeat-{}", now.timestamp()),
        published_at: now,
        description: format!(
            "Heartbeat generated at {}. Scraping was disabled for this run.",
            now.to_rfc2822()
        ),
    };
    Feed::with_items(config, vec![item], now)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> FeedConfig {
        FeedConfig::new("https://example.com/company/acme").unwrap()
    }

    #[test]
    fn empty_result_feed_carries_the_stable_marker_guid() {
        let feed = empty_result_feed(&config(), Utc::now());
        assert_eq!(feed.items.len(), 1);
        assert_eq!(feed.items[0].guid, NO_CONTENT_GUID);
        assert!(feed.items[0].description.contains("blocking"));
    }

    #[test]
    fn failure_feed_reports_kind_and_message() {
        let err = FeedError::Http {
            status: 403,
            url: "https://example.com/company/acme".to_string(),
        };
        let feed = failure_feed(&config(), &err, Utc::now());
        assert_eq!(feed.items.len(), 1);
        assert!(feed.items[0].title.contains("http error"));
        assert!(feed.items[0].description.contains("403"));
        assert!(feed.items[0].guid.starts_with("error-"));
    }

    #[test]
    fn heartbeat_feed_has_a_single_synthetic_item() {
        let feed = heartbeat_feed(&config(), Utc::now());
        assert_eq!(feed.items.len(), 1);
        assert!(feed.items[0].guid.starts_with("heartbeat-"));
    }
}
