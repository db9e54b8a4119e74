use serde_json::json;
use std::time::Duration;
use topic_feed::api::{FeedEndpoint, ResponsesClient};
use topic_feed::errors::{AttemptError, EndpointError, FetchError};
use topic_feed::prompt::ItemCounts;
use topic_feed::service::{FALLBACK_TIER, PRIMARY_TIER};
use topic_feed::{FeedConfig, FeedService};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const COUNTS: ItemCounts = ItemCounts {
    top_stories: 6,
    river_of_news: 12,
    quick_links: 7,
    trending_topics: 5,
};

fn config(server: &MockServer) -> FeedConfig {
    FeedConfig {
        endpoint_url: format!("{}/v1/responses", server.uri()),
        api_key: Some("sk-test".to_string()),
        tier_timeout_secs: 5,
        ..FeedConfig::default()
    }
}

fn feed_text() -> String {
    json!({
        "topic": "Rust",
        "topStories": [
            {
                "id": "1",
                "title": "Old news",
                "summary": "Older.",
                "source": "Some Blog",
                "url": "https://blog.example/old",
                "timestamp": "4 days ago",
                "relatedSources": []
            },
            {
                "id": "2",
                "title": "Fresh news",
                "summary": "Newer.",
                "source": "Reuters",
                "url": "https://www.reuters.com/fresh",
                "timestamp": "30 minutes ago",
                "relatedSources": [
                    {"title": "Echo", "source": "NPR", "url": "https://npr.org/echo", "snippet": "Same story."}
                ]
            }
        ],
        "riverOfNews": [
            {"title": "River A", "source": "Some Blog", "url": "https://blog.example/a"},
            {"title": "River B", "source": "Some Blog", "url": "https://blog.example/b"}
        ],
        "sidebar": {
            "quickLinks": [{"title": "Docs", "url": "https://doc.rust-lang.org", "source": "Rust"}],
            "trendingTopics": ["Cargo", "Async Rust"]
        }
    })
    .to_string()
}

#[tokio::test]
async fn request_sends_contract_and_reads_flat_output() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/responses"))
        .and(header("authorization", "Bearer sk-test"))
        .and(body_partial_json(json!({
            "model": "gpt-4o",
            "max_output_tokens": 4000,
            "tools": [{"type": "web_search", "search_context_size": "high"}],
            "text": {"format": {"type": "json_schema", "name": "news_feed", "strict": true}}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "output_text": "{\"ok\":true}" })))
        .expect(1)
        .mount(&server)
        .await;

    let client = ResponsesClient::new(&config(&server)).unwrap();
    let text = client.request("Rust", COUNTS, 4000).await.unwrap();
    assert_eq!(text, "{\"ok\":true}");
}

#[tokio::test]
async fn request_reads_nested_output() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "output": [
                {"type": "web_search_call", "status": "completed"},
                {"type": "message", "content": [
                    {"type": "output_text", "text": "{\"a\":"},
                    {"type": "output_text", "text": "1}"}
                ]}
            ]
        })))
        .mount(&server)
        .await;

    let client = ResponsesClient::new(&config(&server)).unwrap();
    assert_eq!(client.request("Rust", COUNTS, 4000).await.unwrap(), "{\"a\":1}");
}

#[tokio::test]
async fn request_surfaces_status_and_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429).set_body_string("rate limited"))
        .mount(&server)
        .await;

    let client = ResponsesClient::new(&config(&server)).unwrap();
    match client.request("Rust", COUNTS, 4000).await.unwrap_err() {
        EndpointError::Status { status, body } => {
            assert_eq!(status, 429);
            assert_eq!(body, "rate limited");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn request_rejects_empty_output() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "output_text": "", "output": [] })))
        .mount(&server)
        .await;

    let client = ResponsesClient::new(&config(&server)).unwrap();
    assert!(matches!(
        client.request("Rust", COUNTS, 4000).await.unwrap_err(),
        EndpointError::EmptyOutput
    ));
}

#[tokio::test]
async fn service_falls_back_to_smaller_tier_over_http() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({ "max_output_tokens": PRIMARY_TIER.max_output_tokens })))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({ "max_output_tokens": FALLBACK_TIER.max_output_tokens })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "output_text": format!("Here you go:\n{}\nEnjoy!", feed_text())
        })))
        .expect(1)
        .mount(&server)
        .await;

    let service = FeedService::from_config(&config(&server)).unwrap();
    let feed = service.fetch_feed("Rust").await.unwrap();

    assert_eq!(feed.topic, "Rust");
    let ids: Vec<&str> = feed.top_stories.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, vec!["2", "1"]);
    // River B borrows "30 minutes ago" from story index 1.
    let river: Vec<&str> = feed.river_of_news.iter().map(|r| r.title.as_str()).collect();
    assert_eq!(river, vec!["River B", "River A"]);
    assert_eq!(feed.sidebar.trending_topics, vec!["Cargo", "Async Rust"]);
}

#[tokio::test]
async fn service_reports_fallback_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
        .expect(2)
        .mount(&server)
        .await;

    let service = FeedService::from_config(&config(&server)).unwrap();
    match service.fetch_feed("Rust").await.unwrap_err() {
        FetchError::Exhausted { fallback, .. } => match fallback {
            AttemptError::Endpoint(EndpointError::Status { status, body }) => {
                assert_eq!(status, 503);
                assert_eq!(body, "overloaded");
            }
            other => panic!("unexpected fallback error: {other:?}"),
        },
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn service_times_out_slow_endpoint() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "output_text": feed_text() }))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let mut cfg = config(&server);
    cfg.tier_timeout_secs = 1;
    let service = FeedService::from_config(&cfg).unwrap();

    match service.fetch_feed("Rust").await.unwrap_err() {
        FetchError::Exhausted { primary, fallback, .. } => {
            assert!(matches!(primary, AttemptError::Endpoint(EndpointError::Timeout(_))));
            assert!(matches!(fallback, AttemptError::Endpoint(EndpointError::Timeout(_))));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}
