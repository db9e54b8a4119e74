//! Error types for the feed pipeline.
//!
//! Each layer has its own error type. Lower layers never retry on their own;
//! everything is caught at the [`crate::service`] boundary, which decides
//! whether to fall back to the next tier or give up with a [`FetchError`].

use std::time::Duration;
use thiserror::Error;

/// Invalid or missing configuration. Fatal and never retried.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing API key (set OPENAI_API_KEY or pass --api-key)")]
    MissingApiKey,

    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Yaml {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid endpoint URL: {0}")]
    InvalidEndpoint(#[from] url::ParseError),

    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

/// The endpoint call failed or produced no usable text.
#[derive(Debug, Error)]
pub enum EndpointError {
    #[error("endpoint returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("response body is not valid JSON: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("endpoint returned empty output")]
    EmptyOutput,

    #[error("no response within {0:?}")]
    Timeout(Duration),
}

/// Output text could not be recovered into a feed, even after brace extraction.
#[derive(Debug, Error)]
#[error("output is not a valid feed: {source}")]
pub struct ParseError {
    #[from]
    source: serde_json::Error,
}

impl ParseError {
    /// The parse failure from the first, direct attempt.
    pub fn json_error(&self) -> &serde_json::Error {
        &self.source
    }
}

/// Why a single tier attempt failed.
#[derive(Debug, Error)]
pub enum AttemptError {
    #[error(transparent)]
    Endpoint(#[from] EndpointError),

    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// Terminal failure of [`crate::service::FeedService::fetch_feed`].
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The caller withdrew interest. No fallback tier is attempted.
    #[error("feed request was cancelled")]
    Cancelled,

    /// Both tiers failed. `source()` is the fallback tier's failure.
    #[error("could not build a feed for {topic:?} (primary tier: {primary})")]
    Exhausted {
        topic: String,
        primary: AttemptError,
        #[source]
        fallback: AttemptError,
    },
}
