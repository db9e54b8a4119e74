//! Data models for topic feeds.
//!
//! This module defines the structures exchanged with the generative endpoint
//! and handed to callers:
//! - [`NewsFeed`]: One complete, ranked feed for a single topic
//! - [`NewsStory`]: A featured story with its supporting citations
//! - [`RelatedSource`]: A secondary citation; also the shape of river items
//! - [`Sidebar`] and [`SidebarItem`]: Deep links and trending search terms
//!
//! Field names are serialized in camelCase to match the schema contract the
//! endpoint is asked to honor (see [`crate::schema`]).

use serde::{Deserialize, Serialize};

/// A secondary citation reporting on the same story, or a river item.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RelatedSource {
    pub title: String,
    pub source: String,
    pub url: String,
    /// Short excerpt; the endpoint may omit it or return an empty string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snippet: Option<String>,
}

/// A featured story.
///
/// `id` is unique within a feed. `summary` is expected to stay under ~220
/// characters, but that bound is only requested from the generator and is
/// never enforced locally.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsStory {
    pub id: String,
    pub title: String,
    pub summary: String,
    pub source: String,
    pub url: String,
    /// Relative time string such as `"2 hours ago"`.
    pub timestamp: String,
    #[serde(default)]
    pub related_sources: Vec<RelatedSource>,
}

impl NewsStory {
    /// Host of the story URL without a leading `www.`.
    ///
    /// For example: `"https://www.reuters.com/world/x"` -> `"reuters.com"`
    pub fn domain(&self) -> Option<String> {
        let parsed = url::Url::parse(&self.url).ok()?;
        let host = parsed.host_str()?;
        Some(host.trim_start_matches("www.").to_string())
    }
}

/// A deep-link reference shown in the sidebar.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SidebarItem {
    pub title: String,
    pub url: String,
    pub source: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Sidebar {
    #[serde(default)]
    pub quick_links: Vec<SidebarItem>,
    #[serde(default)]
    pub trending_topics: Vec<String>,
}

/// A complete feed for one topic.
///
/// Produced fresh by every successful pipeline run. Ranking reorders
/// `top_stories` and `river_of_news` before the feed is handed to the caller;
/// nothing mutates it afterwards. A refreshed feed for the same topic is a new
/// value that replaces the old one.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsFeed {
    pub topic: String,
    pub top_stories: Vec<NewsStory>,
    pub river_of_news: Vec<RelatedSource>,
    pub sidebar: Sidebar,
}
