//! Structured-output contract sent with every endpoint request.
//!
//! Strict mode requires every declared property to be listed as required and
//! forbids additional properties at every level, so `snippet` is required
//! here even though [`crate::models::RelatedSource`] accepts it missing.

use serde_json::{Value, json};

/// Name under which the contract is registered with the endpoint.
pub const SCHEMA_NAME: &str = "news_feed";

fn object(properties: Value, required: &[&str]) -> Value {
    json!({
        "type": "object",
        "additionalProperties": false,
        "properties": properties,
        "required": required,
    })
}

fn string() -> Value {
    json!({ "type": "string" })
}

fn array_of(items: Value) -> Value {
    json!({ "type": "array", "items": items })
}

/// JSON Schema describing a [`crate::models::NewsFeed`].
pub fn news_feed_schema() -> Value {
    let related = object(
        json!({ "title": string(), "source": string(), "url": string(), "snippet": string() }),
        &["title", "source", "url", "snippet"],
    );
    let story = object(
        json!({
            "id": string(),
            "title": string(),
            "summary": string(),
            "source": string(),
            "url": string(),
            "timestamp": string(),
            "relatedSources": array_of(related),
        }),
        &["id", "title", "summary", "source", "url", "timestamp", "relatedSources"],
    );
    let river = object(
        json!({ "title": string(), "source": string(), "url": string() }),
        &["title", "source", "url"],
    );
    let quick_link = object(
        json!({ "title": string(), "url": string(), "source": string() }),
        &["title", "url", "source"],
    );
    let sidebar = object(
        json!({
            "quickLinks": array_of(quick_link),
            "trendingTopics": array_of(string()),
        }),
        &["quickLinks", "trendingTopics"],
    );

    object(
        json!({
            "topic": string(),
            "topStories": array_of(story),
            "riverOfNews": array_of(river),
            "sidebar": sidebar,
        }),
        &["topic", "topStories", "riverOfNews", "sidebar"],
    )
}
