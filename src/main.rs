//! # Topic Feed
//!
//! Command-line front end for the feed pipeline. Each topic becomes a tab on a
//! [`FeedBoard`]; tabs are fetched concurrently, and every ready feed is
//! written as JSON (and optionally Markdown).
//!
//! ## Usage
//!
//! ```sh
//! OPENAI_API_KEY=... topic_feed "Quantum Computing" Rust -j ./json -m ./markdown
//! ```
//!
//! Ctrl-C cancels in-flight and queued requests; cancelled topics are not retried.

use chrono::Local;
use clap::Parser;
use std::error::Error;
use tokio::sync::watch;
use tracing::{debug, error, info, instrument, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

use topic_feed::board::{FeedBoard, FeedState, Tab};
use topic_feed::cli::Cli;
use topic_feed::config::FeedConfig;
use topic_feed::outputs::{indexes, json, markdown};
use topic_feed::service::FeedService;
use topic_feed::utils::ensure_writable_dir;

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("topic_feed starting up");

    let args = Cli::parse();
    debug!(?args.json_output_dir, ?args.markdown_output_dir, "Parsed CLI arguments");

    // ---- Configuration ----
    let file_config = match &args.config {
        Some(path) => FeedConfig::load(path).await?,
        None => FeedConfig::default(),
    };
    let config = args.apply(file_config);
    debug!(?config, "Effective configuration");

    let service = match FeedService::from_config(&config) {
        Ok(service) => service,
        Err(e) => {
            error!(error = %e, "Cannot start without a valid configuration");
            return Err(e.into());
        }
    };

    if let Err(e) = ensure_writable_dir(&args.json_output_dir).await {
        error!(
            path = %args.json_output_dir,
            error = %e,
            "JSON output directory is not writable (fix perms or choose a different path)"
        );
        return Err(e);
    }

    // ---- Open tabs ----
    let mut board = FeedBoard::new();
    let mut pending = Vec::new();
    for topic in args.topics_or_default() {
        match board.open(&topic) {
            Some((id, true)) => {
                board.begin(id);
                pending.push((id, topic.trim().to_string()));
            }
            Some((_, false)) => info!(%topic, "Skipping duplicate topic"),
            None => warn!("Skipping blank topic"),
        }
    }
    info!(topics = pending.len(), concurrency = args.concurrency, "Fetching feeds");

    // ---- Fetch concurrently ----
    let (cancel_tx, cancel_rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted; cancelling remaining feeds");
            let _ = cancel_tx.send(true);
        }
    });
    let results = service
        .fetch_all(pending, args.concurrency, &cancel_rx)
        .await;

    for (id, result) in results {
        board.complete(id, result);
    }

    // ---- Outputs ----
    let local_date = Local::now().date_naive().to_string();
    let mut ready = 0usize;
    for tab in board.iter() {
        match &tab.state {
            FeedState::Ready(feed) => {
                ready += 1;
                write_outputs(tab, feed, &args, &local_date).await;
                println!(
                    "{:<8} {} ({} stories, {} river items)",
                    tab.state.label(),
                    tab.topic,
                    feed.top_stories.len(),
                    feed.river_of_news.len()
                );
            }
            FeedState::Failed(e) => {
                let cause = e.source().map(ToString::to_string);
                error!(topic = %tab.topic, error = %e, cause = ?cause, "Feed failed");
                println!("{:<8} {}: {}", tab.state.label(), tab.topic, e);
            }
            other => warn!(topic = %tab.topic, state = other.label(), "Feed never completed"),
        }
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        ready,
        total = board.len(),
        "Execution complete"
    );

    if ready == 0 {
        return Err("no feed could be built".into());
    }
    Ok(())
}

async fn write_outputs(tab: &Tab, feed: &topic_feed::NewsFeed, args: &Cli, local_date: &str) {
    if let Err(e) = json::write_feed(feed, &tab.topic, &args.json_output_dir, local_date).await {
        error!(topic = %tab.topic, error = %e, "Failed to write feed JSON");
    }

    let Some(md_dir) = &args.markdown_output_dir else {
        return;
    };
    match markdown::write_feed(feed, &tab.topic, md_dir, local_date).await {
        Ok(path) => {
            let filename = path
                .file_name()
                .map(|f| f.to_string_lossy().into_owned())
                .unwrap_or_else(|| markdown::markdown_filename(&tab.topic, local_date));
            if let Err(e) = indexes::update_feed_index(md_dir, local_date, &tab.topic, &filename).await {
                error!(error = %e, "Failed to update feed index");
            }
        }
        Err(e) => error!(topic = %tab.topic, error = %e, "Failed to write feed Markdown"),
    }
}
