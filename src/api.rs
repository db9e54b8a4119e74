//! Generative endpoint client.
//!
//! This module talks to an OpenAI-compatible Responses endpoint that can run
//! web searches on the model's behalf. Every request carries the
//! [schema contract](crate::schema) in strict structured-output mode, so a
//! successful reply is a single JSON document in the model's output text.
//!
//! # Architecture
//!
//! - [`FeedEndpoint`]: Core trait, one feed request per call
//! - [`ResponsesClient`]: The HTTP implementation built on `reqwest`
//! - [`extract_output_text`]: Pulls the generated text out of the response envelope
//!
//! There is no retry or backoff here. Recovery is the orchestrator's job and
//! happens by falling back to a smaller tier (see [`crate::service`]).

use crate::config::FeedConfig;
use crate::errors::{ConfigError, EndpointError};
use crate::prompt::{ItemCounts, SYSTEM_INSTRUCTION, build_prompt};
use crate::schema::{SCHEMA_NAME, news_feed_schema};
use crate::utils::truncate_for_log;
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::time::Instant;
use tracing::{debug, info, instrument, warn};
use url::Url;

/// Sampling temperature for every request.
pub const TEMPERATURE: f64 = 0.2;

/// Trait for one feed request against a generative endpoint.
///
/// Implementors perform exactly one remote call per invocation and return the
/// raw generated text, which is expected to be the feed JSON.
pub trait FeedEndpoint {
    async fn request(
        &self,
        topic: &str,
        counts: ItemCounts,
        max_output_tokens: u32,
    ) -> Result<String, EndpointError>;
}

/// HTTP client for a Responses-style endpoint.
pub struct ResponsesClient {
    http: reqwest::Client,
    endpoint: Url,
    api_key: String,
    model: String,
}

impl fmt::Debug for ResponsesClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResponsesClient")
            .field("endpoint", &self.endpoint.as_str())
            .field("model", &self.model)
            .finish()
    }
}

impl ResponsesClient {
    /// Build a client from configuration.
    ///
    /// Fails with [`ConfigError::MissingApiKey`] when no credential is
    /// configured, before any network activity.
    pub fn new(config: &FeedConfig) -> Result<Self, ConfigError> {
        let api_key = config.require_api_key()?.to_string();
        let endpoint = Url::parse(&config.endpoint_url)?;
        let http = reqwest::Client::builder()
            .user_agent(concat!("topic_feed/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(config.connect_timeout())
            .build()
            .map_err(ConfigError::Client)?;

        Ok(Self {
            http,
            endpoint,
            api_key,
            model: config.model.clone(),
        })
    }

    fn body<'a>(&'a self, prompt: &'a str, max_output_tokens: u32) -> RequestBody<'a> {
        RequestBody {
            model: &self.model,
            tools: vec![Tool {
                kind: "web_search",
                search_context_size: "high",
            }],
            max_output_tokens,
            temperature: TEMPERATURE,
            input: vec![
                Message {
                    role: "system",
                    content: SYSTEM_INSTRUCTION,
                },
                Message {
                    role: "user",
                    content: prompt,
                },
            ],
            text: TextOptions {
                format: Format {
                    kind: "json_schema",
                    name: SCHEMA_NAME,
                    schema: news_feed_schema(),
                    strict: true,
                },
            },
        }
    }
}

impl FeedEndpoint for ResponsesClient {
    #[instrument(level = "info", skip_all, fields(topic = %topic, max_output_tokens = max_output_tokens))]
    async fn request(
        &self,
        topic: &str,
        counts: ItemCounts,
        max_output_tokens: u32,
    ) -> Result<String, EndpointError> {
        let t0 = Instant::now();
        let prompt = build_prompt(topic, counts);
        debug!(?counts, "Sending feed request");

        let response = self
            .http
            .post(self.endpoint.clone())
            .bearer_auth(&self.api_key)
            .json(&self.body(&prompt, max_output_tokens))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(
                status = status.as_u16(),
                elapsed_ms = t0.elapsed().as_millis() as u64,
                body = %truncate_for_log(&body, 300),
                "Endpoint rejected request"
            );
            return Err(EndpointError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await?;
        let envelope: Value = serde_json::from_slice(&bytes)?;
        let text = extract_output_text(&envelope).ok_or(EndpointError::EmptyOutput)?;

        info!(
            elapsed_ms = t0.elapsed().as_millis() as u64,
            chars = text.len(),
            "Endpoint returned output"
        );
        Ok(text)
    }
}

/// Pull the generated text out of a response envelope.
///
/// Responses carry the text in one of two shapes, depending on the server:
///
/// 1. A flattened top-level `output_text` string
/// 2. Content blocks under `output[].content[]`, interleaved with tool calls
///    and refusals
///
/// # Arguments
///
/// * `envelope` - The decoded response body
///
/// # Returns
///
/// A non-blank top-level `output_text` if present. Otherwise the text of every
/// `output_text` block concatenated in order, or `None` when that is empty.
///
/// # Examples
///
/// ```ignore
/// let envelope = json!({"output": [{"content": [
///     {"type": "output_text", "text": "{\"topic\":"},
///     {"type": "output_text", "text": "\"rust\"}"}
/// ]}]});
/// assert_eq!(extract_output_text(&envelope).as_deref(), Some("{\"topic\":\"rust\"}"));
/// ```
pub fn extract_output_text(envelope: &Value) -> Option<String> {
    if let Some(text) = envelope.get("output_text").and_then(Value::as_str) {
        if !text.trim().is_empty() {
            return Some(text.to_string());
        }
    }

    let joined: String = envelope
        .get("output")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(|item| item.get("content").and_then(Value::as_array))
        .flatten()
        .filter(|block| block.get("type").and_then(Value::as_str) == Some("output_text"))
        .filter_map(|block| block.get("text").and_then(Value::as_str))
        .collect();

    if joined.is_empty() { None } else { Some(joined) }
}

#[derive(Debug, Serialize)]
struct RequestBody<'a> {
    model: &'a str,
    tools: Vec<Tool>,
    max_output_tokens: u32,
    temperature: f64,
    input: Vec<Message<'a>>,
    text: TextOptions,
}

#[derive(Debug, Serialize)]
struct Tool {
    #[serde(rename = "type")]
    kind: &'static str,
    search_context_size: &'static str,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct TextOptions {
    format: Format,
}

#[derive(Debug, Serialize)]
struct Format {
    #[serde(rename = "type")]
    kind: &'static str,
    name: &'static str,
    schema: Value,
    strict: bool,
}
