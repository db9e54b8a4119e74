//! Output writers for fetched feeds.
//!
//! # Submodules
//!
//! - [`json`]: Writes a [`NewsFeed`](crate::models::NewsFeed) as JSON
//! - [`markdown`]: Renders a feed as a readable Markdown page
//! - [`indexes`]: Maintains the Markdown index of all written feeds
//!
//! # Output Structure
//!
//! ```text
//! json_output_dir/
//! └── 2025-05-06/
//!     ├── artificial-intelligence.json
//!     └── rust.json
//!
//! markdown_output_dir/
//! ├── 2025-05-06_artificial-intelligence.md
//! ├── 2025-05-06_rust.md
//! └── feeds.md                 # Index of all feeds by date
//! ```

pub mod indexes;
pub mod json;
pub mod markdown;
