//! Freshness and authority ranking.
//!
//! Stories are ordered by a score combining how recent they are (parsed from
//! relative timestamps like `"2 hours ago"`) with a flat boost for a curated
//! set of high-authority publishers.
//!
//! # Scoring
//!
//! ```text
//! score = -(age_minutes / 100_000) + boost      (known age)
//! score = -boost                                (unknown age)
//! boost = 0.15 if the source is curated, else 0
//! ```
//!
//! # River items
//!
//! River items carry no timestamp of their own. Item `i` borrows the
//! timestamp of top story `i` (in the order the endpoint returned them), and is
//! treated as unknown-age when there is no story at that index. This assumes
//! the endpoint produces both lists in related order; if it does not, river
//! ranking degrades silently to source authority plus noise.

use crate::models::{NewsFeed, RelatedSource};
use once_cell::sync::Lazy;
use regex::Regex;
use std::cmp::Ordering;
use std::collections::HashSet;

/// Score bonus for curated publishers.
pub const AUTHORITY_BOOST: f64 = 0.15;

/// Minutes of age that cost one full point of score.
const AGE_SCALE_MINUTES: f64 = 100_000.0;

static RELATIVE_TIME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d+)\s*(minute|hour|day|week|month|year)s?\s*ago").expect("valid regex")
});

static AUTHORITY_SOURCES: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "reuters",
        "associated press",
        "ap",
        "bloomberg",
        "financial times",
        "the wall street journal",
        "wall street journal",
        "wsj",
        "the new york times",
        "new york times",
        "the washington post",
        "washington post",
        "the guardian",
        "bbc",
        "bbc news",
        "npr",
        "the economist",
        "al jazeera",
        "the verge",
        "wired",
        "arstechnica",
        "techcrunch",
    ]
    .into_iter()
    .collect()
});

fn unit_minutes(unit: &str) -> f64 {
    match unit {
        "minute" => 1.0,
        "hour" => 60.0,
        "day" => 1_440.0,
        "week" => 10_080.0,
        "month" => 43_200.0,
        _ => 525_600.0,
    }
}

/// Age in minutes of a relative timestamp such as `"3 Days ago"`.
///
/// Returns `f64::INFINITY` for anything that does not match
/// `<integer> <unit>[s] ago`.
pub fn relative_age_minutes(timestamp: &str) -> f64 {
    let value = timestamp.trim().to_lowercase();
    let Some(caps) = RELATIVE_TIME.captures(&value) else {
        return f64::INFINITY;
    };
    let amount: f64 = caps[1].parse().unwrap_or(f64::INFINITY);
    amount * unit_minutes(&caps[2])
}

/// Whether `source` is one of the curated high-authority publishers.
pub fn is_authority_source(source: &str) -> bool {
    AUTHORITY_SOURCES.contains(source.trim().to_lowercase().as_str())
}

/// Ranking score for an item; higher sorts first.
pub fn score(timestamp: &str, source: &str) -> f64 {
    let boost = if is_authority_source(source) {
        AUTHORITY_BOOST
    } else {
        0.0
    };
    let minutes = relative_age_minutes(timestamp);
    if !minutes.is_finite() {
        return -boost;
    }
    -(minutes / AGE_SCALE_MINUTES) + boost
}

/// Stable sort by descending score.
fn sort_by_score<T>(items: Vec<T>, mut score_of: impl FnMut(usize, &T) -> f64) -> Vec<T> {
    let mut scored: Vec<(f64, T)> = items
        .into_iter()
        .enumerate()
        .map(|(i, item)| (score_of(i, &item), item))
        .collect();
    scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(Ordering::Equal));
    scored.into_iter().map(|(_, item)| item).collect()
}

/// Reorder a feed's top stories and river by freshness and authority.
///
/// Only reorders; nothing is added, removed, or otherwise changed.
pub fn rank(feed: NewsFeed) -> NewsFeed {
    let NewsFeed {
        topic,
        top_stories,
        river_of_news,
        sidebar,
    } = feed;

    let proxies: Vec<String> = top_stories.iter().map(|s| s.timestamp.clone()).collect();
    let river_of_news = sort_by_score(river_of_news, |i, item: &RelatedSource| {
        score(proxies.get(i).map_or("", String::as_str), &item.source)
    });
    let top_stories = sort_by_score(top_stories, |_, story| score(&story.timestamp, &story.source));

    NewsFeed {
        topic,
        top_stories,
        river_of_news,
        sidebar,
    }
}
