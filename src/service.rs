//! Feed orchestration with tiered fallback.
//!
//! A feed request runs through at most two tiers:
//!
//! ```text
//! Primary ──ok──> rank ──> feed
//!    │
//!  error
//!    ▼
//! Fallback ──ok──> rank ──> feed
//!    │
//!  error ──> FetchError::Exhausted
//! ```
//!
//! Any failure of the primary tier (transport, HTTP status, empty output,
//! unparseable output, deadline) triggers exactly one fallback attempt with
//! smaller counts and a smaller output budget, immediately and without
//! backoff. Cancellation is terminal and never falls back. No partial feed is
//! ever returned.

use crate::api::{FeedEndpoint, ResponsesClient};
use crate::config::FeedConfig;
use crate::errors::{AttemptError, EndpointError, FetchError};
use crate::models::NewsFeed;
use crate::parser::parse_feed;
use crate::prompt::ItemCounts;
use crate::ranking::rank;
use futures::stream::{self, StreamExt};
use std::future::{Future, pending};
use std::time::{Duration, Instant};
use tokio::sync::watch;
use tokio::time::timeout;
use tracing::{error, info, instrument, warn};

/// One attempt configuration: item counts plus output token budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tier {
    pub name: &'static str,
    pub counts: ItemCounts,
    pub max_output_tokens: u32,
}

pub const PRIMARY_TIER: Tier = Tier {
    name: "primary",
    counts: ItemCounts {
        top_stories: 6,
        river_of_news: 12,
        quick_links: 7,
        trending_topics: 5,
    },
    max_output_tokens: 4000,
};

pub const FALLBACK_TIER: Tier = Tier {
    name: "fallback",
    counts: ItemCounts {
        top_stories: 5,
        river_of_news: 10,
        quick_links: 6,
        trending_topics: 4,
    },
    max_output_tokens: 2200,
};

/// Builds ranked feeds using an endpoint.
///
/// Holds no per-request state, so one service can serve concurrent requests
/// for different topics.
#[derive(Debug)]
pub struct FeedService<E> {
    endpoint: E,
    tier_timeout: Duration,
}

impl FeedService<ResponsesClient> {
    /// Service backed by the HTTP client described by `config`.
    ///
    /// Fails fast with [`FetchError::Config`] when the credential is missing.
    pub fn from_config(config: &FeedConfig) -> Result<Self, FetchError> {
        let client = ResponsesClient::new(config)?;
        Ok(Self::new(client, config.tier_timeout()))
    }
}

impl<E: FeedEndpoint> FeedService<E> {
    pub fn new(endpoint: E, tier_timeout: Duration) -> Self {
        Self {
            endpoint,
            tier_timeout,
        }
    }

    /// Fetch, parse, and rank a feed for `topic`.
    pub async fn fetch_feed(&self, topic: &str) -> Result<NewsFeed, FetchError> {
        self.fetch_feed_until(topic, pending::<()>()).await
    }

    /// Like [`fetch_feed`](Self::fetch_feed), but gives up with
    /// [`FetchError::Cancelled`] as soon as `cancel` completes.
    #[instrument(level = "info", skip_all, fields(topic = %topic))]
    pub async fn fetch_feed_until(
        &self,
        topic: &str,
        cancel: impl Future<Output = ()>,
    ) -> Result<NewsFeed, FetchError> {
        tokio::pin!(cancel);

        let primary = tokio::select! {
            biased;
            _ = &mut cancel => {
                info!(tier = PRIMARY_TIER.name, "Feed request cancelled");
                return Err(FetchError::Cancelled);
            }
            result = self.attempt(topic, PRIMARY_TIER) => result,
        };
        let primary = match primary {
            Ok(feed) => return Ok(feed),
            Err(e) => {
                warn!(error = %e, "Primary tier failed; falling back");
                e
            }
        };

        let fallback = tokio::select! {
            biased;
            _ = &mut cancel => {
                info!(tier = FALLBACK_TIER.name, "Feed request cancelled");
                return Err(FetchError::Cancelled);
            }
            result = self.attempt(topic, FALLBACK_TIER) => result,
        };
        match fallback {
            Ok(feed) => Ok(feed),
            Err(fallback) => {
                error!(error = %fallback, "Fallback tier failed; giving up");
                Err(FetchError::Exhausted {
                    topic: topic.to_string(),
                    primary,
                    fallback,
                })
            }
        }
    }

    /// Fetch several topics with at most `concurrency` requests in flight.
    ///
    /// Every request watches the same `cancel` flag. Once it reads `true`,
    /// in-flight requests stop and topics that have not started yet fail with
    /// [`FetchError::Cancelled`] without calling the endpoint. A sender dropped
    /// without firing never cancels.
    ///
    /// # Returns
    ///
    /// One `(key, result)` pair per job, in completion order.
    pub async fn fetch_all<K>(
        &self,
        jobs: impl IntoIterator<Item = (K, String)>,
        concurrency: usize,
        cancel: &watch::Receiver<bool>,
    ) -> Vec<(K, Result<NewsFeed, FetchError>)> {
        stream::iter(jobs)
            .map(|(key, topic)| {
                let mut cancel = cancel.clone();
                async move {
                    let cancelled = async move {
                        let fired = cancel.wait_for(|fired| *fired).await.is_ok();
                        if !fired {
                            pending::<()>().await;
                        }
                    };
                    let result = self.fetch_feed_until(&topic, cancelled).await;
                    (key, result)
                }
            })
            .buffer_unordered(concurrency.max(1))
            .collect()
            .await
    }

    /// One tier: request, parse, rank. The request is bounded by `tier_timeout`.
    async fn attempt(&self, topic: &str, tier: Tier) -> Result<NewsFeed, AttemptError> {
        let t0 = Instant::now();
        info!(tier = tier.name, max_output_tokens = tier.max_output_tokens, "Starting tier");

        let text = timeout(
            self.tier_timeout,
            self.endpoint.request(topic, tier.counts, tier.max_output_tokens),
        )
        .await
        .map_err(|_| EndpointError::Timeout(self.tier_timeout))??;
        let feed = rank(parse_feed(&text)?);

        info!(
            tier = tier.name,
            elapsed_ms = t0.elapsed().as_millis() as u64,
            top_stories = feed.top_stories.len(),
            river = feed.river_of_news.len(),
            "Tier produced feed"
        );
        Ok(feed)
    }
}

/// Fetch a ranked feed for `topic` using the HTTP endpoint in `config`.
pub async fn fetch_feed(config: &FeedConfig, topic: &str) -> Result<NewsFeed, FetchError> {
    FeedService::from_config(config)?.fetch_feed(topic).await
}
