//! Async HTTP fetcher wrapping reqwest.
//!
//! Not a browser — one GET per run. Redirects are followed by the client
//! policy, capped at 5 hops, and a request timeout is always set because
//! the upstream page is uncontrolled.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};

use crate::error::{FeedError, FeedResult};

/// Browser-like user agent. Some hosts serve automation-unfriendly
/// placeholder markup to unknown clients.
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
                          AppleWebKit/537.36 (KHTML, like Gecko) \
                          Chrome/131.0.0.0 Safari/537.36";

const ACCEPT_HTML: &str = "text/html,application/xhtml+xml,application/xml";

/// HTTP client for the scrape stage.
#[derive(Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Build a fetcher with the standard header set and timeout applied.
    pub fn new(timeout: Duration) -> FeedResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_HTML));

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::limited(5))
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .build()
            .map_err(FeedError::Network)?;

        Ok(Self { client })
    }

    /// GET `url` and return the response body as text.
    ///
    /// Transport failures map to [`FeedError::Network`], terminal non-2xx
    /// statuses to [`FeedError::Http`]. The redirect chain is resolved by
    /// the client before either check applies.
    pub async fn fetch_page(&self, url: &str) -> FeedResult<String> {
        tracing::debug!(url, "fetching page");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(FeedError::Network)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FeedError::Http {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.text().await.map_err(FeedError::Network)?;
        tracing::debug!(bytes = body.len(), "page fetched");
        Ok(body)
    }
}
