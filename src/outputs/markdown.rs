//! Markdown rendering of a feed.
//!
//! Layout mirrors the feed UI: featured stories first, then the river,
//! quick links, and trending topics as hashtags.

use crate::models::{NewsFeed, NewsStory};
use crate::outputs::json::file_stem;
use crate::utils::hashtag;
use itertools::Itertools;
use std::error::Error;
use std::fmt::Write;
use std::path::PathBuf;
use tokio::fs;
use tracing::{info, instrument};

fn write_story(md: &mut String, story: &NewsStory) -> std::fmt::Result {
    writeln!(md, "### [{}]({})\n", story.title, story.url)?;
    let domain = story
        .domain()
        .map(|d| format!(" <small>`{d}`</small>"))
        .unwrap_or_default();
    writeln!(md, "*{}* · {}{}\n", story.source, story.timestamp, domain)?;
    writeln!(md, "{}\n", story.summary)?;

    if !story.related_sources.is_empty() {
        writeln!(md, "**Also reporting:**\n")?;
        for related in &story.related_sources {
            match related.snippet.as_deref().filter(|s| !s.trim().is_empty()) {
                Some(snippet) => writeln!(
                    md,
                    "- [{}]({}) ({}): {}",
                    related.title, related.url, related.source, snippet
                )?,
                None => writeln!(md, "- [{}]({}) ({})", related.title, related.url, related.source)?,
            }
        }
        writeln!(md)?;
    }
    Ok(())
}

fn render(feed: &NewsFeed) -> Result<String, std::fmt::Error> {
    let mut md = String::new();
    writeln!(md, "# {}\n", feed.topic)?;

    writeln!(md, "## Featured Highlights\n")?;
    for story in &feed.top_stories {
        write_story(&mut md, story)?;
    }

    if !feed.river_of_news.is_empty() {
        writeln!(md, "## The River\n")?;
        for item in &feed.river_of_news {
            writeln!(md, "- [{}]({}) · *{}*", item.title, item.url, item.source)?;
        }
        writeln!(md)?;
    }

    if !feed.sidebar.quick_links.is_empty() {
        writeln!(md, "## Quick Links\n")?;
        for link in &feed.sidebar.quick_links {
            writeln!(md, "- [{}]({}) · *{}*", link.title, link.url, link.source)?;
        }
        writeln!(md)?;
    }

    if !feed.sidebar.trending_topics.is_empty() {
        writeln!(md, "## Deep Explore\n")?;
        writeln!(
            md,
            "{}",
            feed.sidebar.trending_topics.iter().map(|t| hashtag(t)).join(" ")
        )?;
    }

    Ok(md)
}

/// Render `feed` as a Markdown document.
pub fn feed_to_markdown(feed: &NewsFeed) -> String {
    // Writing into a String cannot fail.
    render(feed).unwrap_or_default()
}

/// Markdown file name for a feed written on `local_date`.
pub fn markdown_filename(topic: &str, local_date: &str) -> String {
    format!("{}_{}.md", local_date, file_stem(topic))
}

/// Write the Markdown page for `feed` and return its path.
///
/// The page is named after `topic`, the requested topic, so two requests that
/// come back with the same echoed `feed.topic` never share a page.
#[instrument(level = "info", skip_all, fields(%markdown_output_dir, topic = %topic))]
pub async fn write_feed(
    feed: &NewsFeed,
    topic: &str,
    markdown_output_dir: &str,
    local_date: &str,
) -> Result<PathBuf, Box<dyn Error>> {
    fs::create_dir_all(markdown_output_dir).await?;
    let path = PathBuf::from(markdown_output_dir).join(markdown_filename(topic, local_date));
    fs::write(&path, feed_to_markdown(feed)).await?;
    info!(path = %path.display(), "Wrote feed Markdown");
    Ok(path)
}
