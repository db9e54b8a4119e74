//! Markdown index of written feeds.
//!
//! `feeds.md` lists every feed page grouped by date, newest date first:
//!
//! ```text
//! # Topic Feeds
//!
//! - [**2025-05-06**]
//!     - [Artificial Intelligence](./2025-05-06_artificial-intelligence.md)
//!     - [Rust](./2025-05-06_rust.md)
//! ```
//!
//! Re-running a topic on the same day does not duplicate its entry.

use std::error::Error;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument};

const INDEX_FILE: &str = "feeds.md";
const INDEX_HEADING: &str = "# Topic Feeds";

/// Insert `date` / `topic` into the index text, returning the new text.
pub fn insert_entry(content: &str, local_date: &str, topic: &str, markdown_filename: &str) -> String {
    let date_heading = format!("- [**{local_date}**]");
    let entry = format!("    - [{topic}](./{markdown_filename})");

    let mut lines: Vec<String> = if content.trim().is_empty() {
        vec![INDEX_HEADING.to_string()]
    } else {
        content.lines().map(str::to_string).collect()
    };

    if let Some(i) = lines.iter().position(|l| l.trim() == date_heading) {
        let mut j = i + 1;
        while j < lines.len() && lines[j].starts_with("    - ") {
            if lines[j] == entry {
                return lines.join("\n") + "\n";
            }
            j += 1;
        }
        lines.insert(j, entry);
    } else {
        let insert_at = lines
            .iter()
            .position(|l| l.starts_with(INDEX_HEADING))
            .map_or(lines.len(), |pos| pos + 1);
        lines.insert(insert_at, String::new());
        lines.insert(insert_at + 1, date_heading);
        lines.insert(insert_at + 2, entry);
    }

    lines.join("\n") + "\n"
}

/// Add a feed page to `{markdown_output_dir}/feeds.md`.
#[instrument(level = "info", skip_all, fields(%markdown_output_dir, date = %local_date, %topic))]
pub async fn update_feed_index(
    markdown_output_dir: &str,
    local_date: &str,
    topic: &str,
    markdown_filename: &str,
) -> Result<(), Box<dyn Error>> {
    let index_path = Path::new(markdown_output_dir).join(INDEX_FILE);
    let content = if index_path.exists() {
        fs::read_to_string(&index_path).await?
    } else {
        String::new()
    };

    let updated = insert_entry(&content, local_date, topic, markdown_filename);
    fs::write(&index_path, updated).await?;
    info!(path = %index_path.display(), "Updated feed index");
    Ok(())
}
