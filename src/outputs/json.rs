//! JSON output for fetched feeds.
//!
//! Files are grouped by local date and named after the slug of the requested
//! topic: `{json_output_dir}/{date}/{slug}.json`. Fetching the same topic again
//! on the same day replaces the earlier file.

use crate::models::NewsFeed;
use crate::utils::slugify;
use std::error::Error;
use std::path::PathBuf;
use tokio::fs;
use tracing::{error, info, instrument};

/// Write a feed as pretty-printed JSON.
///
/// The file name comes from `topic`, the topic the caller asked for, not from
/// `feed.topic`, which is whatever the endpoint echoed back.
///
/// # Arguments
///
/// * `feed` - The ranked feed to serialize
/// * `topic` - The requested topic, used for the file name
/// * `json_output_dir` - Base directory for JSON output
/// * `local_date` - Date string used as the subdirectory (e.g., `"2025-05-06"`)
///
/// # Returns
///
/// The path of the written file, e.g. `{json_output_dir}/2025-05-06/rust.json`.
///
/// # Errors
///
/// Returns an error if serialization fails, the directory cannot be created,
/// or the file cannot be written.
#[instrument(level = "info", skip_all, fields(json_output_dir = %json_output_dir, topic = %topic))]
pub async fn write_feed(
    feed: &NewsFeed,
    topic: &str,
    json_output_dir: &str,
    local_date: &str,
) -> Result<PathBuf, Box<dyn Error>> {
    let json = serde_json::to_string_pretty(feed)?;

    let dir = PathBuf::from(json_output_dir).join(local_date);
    if let Err(e) = fs::create_dir_all(&dir).await {
        error!(dir = %dir.display(), error = %e, "Failed to create JSON dir");
        return Err(e.into());
    }

    let path = dir.join(format!("{}.json", file_stem(topic)));
    fs::write(&path, json).await?;
    info!(path = %path.display(), "Wrote feed JSON");

    Ok(path)
}

/// File stem for a topic; falls back to `"topic"` when the slug is empty.
pub fn file_stem(topic: &str) -> String {
    let slug = slugify(topic);
    if slug.is_empty() { "topic".to_string() } else { slug }
}
