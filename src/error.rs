//! Error taxonomy for the scrape-to-feed pipeline.
//!
//! Everything upstream of the final file write is recoverable: the
//! fallback policy folds it into the feed instead of failing the run.

use thiserror::Error;

/// Errors that can occur while producing a feed.
#[derive(Debug, Error)]
pub enum FeedError {
    /// DNS, TLS, connect, or timeout failure — no HTTP status existed yet.
    #[error("network error: {0}")]
    Network(#[source] reqwest::Error),

    /// The server answered with a terminal non-2xx status.
    #[error("HTTP {status} when fetching {url}")]
    Http { status: u16, url: String },

    /// The extractor could not make sense of the document or its config.
    #[error("parse error: {0}")]
    Parse(String),

    /// XML serializer failure.
    #[error("XML write error: {0}")]
    Xml(String),

    /// The output file could not be written.
    #[error("failed to write feed file: {0}")]
    Write(#[from] std::io::Error),

    /// The configured page URL does not parse.
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl FeedError {
    /// Short stable name for the error category. Shows up in the title of
    /// the fallback item so a feed reader makes the failure visible.
    pub fn kind(&self) -> &'static str {
        match self {
            FeedError::Network(_) => "network",
            FeedError::Http { .. } => "http",
            FeedError::Parse(_) => "parse",
            FeedError::Xml(_) => "xml",
            FeedError::Write(_) => "write",
            FeedError::InvalidUrl(_) => "config",
        }
    }
}

/// Convenience result type.
pub type FeedResult<T> = Result<T, FeedError>;
