//! # Tech News Daily
//!
//! A two-step publishing pipeline for a daily tech-news digest. Feeds from a
//! fixed set of sources are archived as dated JSON snapshots, and the archive
//! is rendered into a static site with date navigation.
//!
//! ## Usage
//!
//! ```sh
//! tech_news_daily ingest     # data/news/{date}.json, latest.json, index.json
//! tech_news_daily publish    # docs/TechNews/{date}.html, index.html, assets/
//! ```
//!
//! ## Architecture
//!
//! 1. **Ingest**: fetch each source in turn, normalize entries, archive the
//!    batch under today's date (UTC+8) and update the rolling date index
//! 2. **Publish**: render one page per indexed date, a redirect to the newest
//!    page, and copy static assets
//!
//! The two steps share nothing but the data directory.

use clap::Parser;
use std::error::Error;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, instrument};
use tracing_subscriber::{fmt as tfmt, EnvFilter};

mod cli;
mod ingest;
mod models;
mod outputs;
mod publish;
mod scrapers;
mod sources;
mod utils;

use cli::{Cli, Command, IngestArgs, PublishArgs};
use ingest::Ingestor;
use outputs::html::Site;
use publish::PublishPaths;
use scrapers::HttpFeedFetcher;
use utils::{archive_now, ensure_writable_dir};

#[tokio::main]
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

    let start_time = Instant::now();
    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    let result = match args.command {
        Command::Ingest(args) => run_ingest(args).await,
        Command::Publish(args) => run_publish(args).await,
    };

    if let Err(e) = &result {
        error!(error = %e, "Run aborted");
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        "Execution complete"
    );
    result
}

#[instrument(level = "info", skip_all)]
async fn run_ingest(args: IngestArgs) -> Result<(), Box<dyn Error>> {
    if let Err(e) = ensure_writable_dir(&args.data_dir).await {
        error!(
            path = %args.data_dir.display(),
            error = %e,
            "Data directory is not writable (fix perms or choose a different path)"
        );
        return Err(e);
    }

    if let Some(previous) = ingest::peek_latest(&args.data_dir).await {
        info!(date = %previous.date, total = previous.total, "Previous latest snapshot");
    }

    let sources = sources::load_sources(args.sources.as_deref()).await?;
    info!(count = sources.len(), "Starting ingest");

    let ingestor = Ingestor::new(HttpFeedFetcher::new()?, sources)
        .with_delay(Duration::from_millis(args.delay_ms));
    let outcome = ingestor.run(&args.data_dir, archive_now()).await?;

    info!(
        date = %outcome.snapshot.date,
        total = outcome.snapshot.total,
        archived_dates = outcome.index.dates.len(),
        "Ingest complete"
    );
    Ok(())
}

#[instrument(level = "info", skip_all)]
async fn run_publish(args: PublishArgs) -> Result<(), Box<dyn Error>> {
    let sources = sources::load_sources(args.sources.as_deref()).await?;
    let site = Site::new(
        &args.base_path,
        sources.into_iter().map(|s| s.name).collect(),
    );
    let paths = PublishPaths {
        data_dir: args.data_dir,
        out_dir: args.out_dir,
        assets_dir: args.assets_dir,
    };

    let report = publish::run(&paths, &site).await?;
    info!(
        pages = report.pages.len(),
        skipped = report.skipped.len(),
        redirect_to = ?report.redirect_to,
        assets = report.assets_copied,
        "Publish complete"
    );
    Ok(())
}
