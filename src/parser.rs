//! Tolerant conversion of model output into a [`NewsFeed`].
//!
//! Endpoints sometimes wrap valid JSON in commentary or code fences despite
//! instructions. When a direct parse fails, the text between the first `{`
//! and the last `}` is tried instead. No further repair is attempted.

use crate::errors::ParseError;
use crate::models::NewsFeed;
use crate::utils::{looks_truncated, truncate_for_log};
use tracing::{debug, warn};

/// Parse raw output text into a feed.
///
/// On failure the error carries the direct-parse failure, not the failure of
/// the brace-extraction attempt.
pub fn parse_feed(raw: &str) -> Result<NewsFeed, ParseError> {
    let trimmed = raw.trim();
    let original = match serde_json::from_str::<NewsFeed>(trimmed) {
        Ok(feed) => return Ok(feed),
        Err(e) => e,
    };

    if let (Some(start), Some(end)) = (trimmed.find('{'), trimmed.rfind('}')) {
        if start < end {
            match serde_json::from_str::<NewsFeed>(&trimmed[start..=end]) {
                Ok(feed) => {
                    debug!(
                        leading = start,
                        trailing = trimmed.len() - end - 1,
                        "Recovered feed from wrapped output"
                    );
                    return Ok(feed);
                }
                Err(e) => debug!(error = %e, "Brace-extracted block is not a feed either"),
            }
        }
    }

    warn!(
        error = %original,
        truncated = looks_truncated(&original),
        preview = %truncate_for_log(trimmed, 300),
        "Output is not a valid feed"
    );
    Err(original.into())
}
