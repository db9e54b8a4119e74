//! # Topic Feed
//!
//! Builds a ranked, topic-scoped news feed by delegating search and
//! summarization to a grounded generative endpoint.
//!
//! ## Pipeline
//!
//! 1. **Prompt**: Build instructions for the requested item counts ([`prompt`])
//! 2. **Request**: Call the endpoint with a strict output schema ([`api`], [`schema`])
//! 3. **Parse**: Recover the feed JSON, tolerating stray wrapping text ([`parser`])
//! 4. **Rank**: Order stories and the river by freshness and authority ([`ranking`])
//!
//! [`service::FeedService`] runs these steps, falling back once to a smaller
//! tier when the first attempt fails.
//!
//! ```ignore
//! let config = FeedConfig { api_key: Some(key), ..FeedConfig::default() };
//! let feed = topic_feed::fetch_feed(&config, "Quantum Computing").await?;
//! ```

pub mod api;
pub mod board;
pub mod cli;
pub mod config;
pub mod errors;
pub mod models;
pub mod outputs;
pub mod parser;
pub mod prompt;
pub mod ranking;
pub mod schema;
pub mod service;
pub mod utils;

pub use config::FeedConfig;
pub use errors::FetchError;
pub use models::NewsFeed;
pub use service::{FeedService, fetch_feed};
