//! Run configuration.
//!
//! One `FeedConfig` describes everything a single pipeline run needs.
//! Defaults mirror the historical scheduled job: one fixed company page,
//! one output file, overwritten in full on every run.

use std::path::PathBuf;

use url::Url;

use crate::error::FeedResult;

/// Page scraped when no URL argument is given.
pub const DEFAULT_PAGE_URL: &str = "https://www.linkedin.com/company/leverege";
/// Output file consumed by the downstream automation trigger.
pub const DEFAULT_OUTPUT_FILE: &str = "linkedin-feed.xml";
/// Upper bound on items per generated document.
pub const DEFAULT_MAX_ITEMS: usize = 10;
/// Minimum trimmed candidate length considered meaningful content.
pub const DEFAULT_MIN_TEXT_LEN: usize = 20;
/// Request timeout. The upstream page is uncontrolled, so a run must not
/// hang past the automation schedule.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration for one scrape-to-feed run.
#[derive(Debug, Clone)]
pub struct FeedConfig {
    /// Page to scrape.
    pub page_url: Url,
    /// Where the RSS document lands.
    pub output_path: PathBuf,
    /// Channel `<title>`.
    pub channel_title: String,
    /// Channel `<description>`.
    pub channel_description: String,
    /// Upper bound on items per run.
    pub max_items: usize,
    /// Minimum trimmed candidate length considered meaningful.
    pub min_text_len: usize,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
    /// Skip scraping entirely and emit a synthetic heartbeat item.
    pub heartbeat: bool,
}

impl FeedConfig {
    /// Config for scraping `url`, everything else at defaults.
    pub fn new(url: &str) -> FeedResult<Self> {
        let page_url = Url::parse(url)?;
        let host = page_url.host_str().unwrap_or("unknown").to_string();

        Ok(Self {
            channel_title: format!("Posts from {host}"),
            channel_description: format!("Latest posts scraped from {page_url}"),
            page_url,
            output_path: PathBuf::from(DEFAULT_OUTPUT_FILE),
            max_items: DEFAULT_MAX_ITEMS,
            min_text_len: DEFAULT_MIN_TEXT_LEN,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            heartbeat: false,
        })
    }
}
