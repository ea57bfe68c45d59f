//! The ingest pipeline: fetch every source, normalize, archive.
//!
//! Sources are processed one at a time in declaration order. Each source is
//! isolated: a fetch or parse failure is logged and that source simply
//! contributes no articles. A politeness delay separates consecutive fetches.
//!
//! # Normalization
//!
//! For each of the first [`MAX_ENTRIES_PER_SOURCE`] entries of a feed:
//! - summary falls back to description, published falls back to updated
//! - the summary is reduced to plain text of at most 300 characters
//! - relative links are resolved against the feed URL
//! - entries with an empty title or link are dropped

use crate::models::{Article, DailySnapshot, DateIndex, FeedEntry, SourceDescriptor, SourceKind};
use crate::outputs::{indexes, json};
use crate::scrapers::FetchFeed;
use crate::utils::{archive_date, archive_timestamp, clean_html, truncate_for_log};
use chrono::{DateTime, FixedOffset};
use std::error::Error;
use std::path::Path;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info, instrument, warn};
use url::Url;

/// Only the first entries of each feed are considered.
pub const MAX_ENTRIES_PER_SOURCE: usize = 8;

/// Default pause between two source fetches.
pub const POLITENESS_DELAY: Duration = Duration::from_secs(1);

/// Result of one ingest run.
#[derive(Debug)]
pub struct IngestOutcome {
    pub snapshot: DailySnapshot,
    pub index: DateIndex,
}

/// Runs the ingest pipeline over a fixed list of sources.
#[derive(Debug)]
pub struct Ingestor<F> {
    fetcher: F,
    sources: Vec<SourceDescriptor>,
    delay: Duration,
}

impl<F: FetchFeed> Ingestor<F> {
    pub fn new(fetcher: F, sources: Vec<SourceDescriptor>) -> Self {
        Self {
            fetcher,
            sources,
            delay: POLITENESS_DELAY,
        }
    }

    /// Override the pause between sources.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Fetch and normalize one source. Never fails: errors yield no articles.
    #[instrument(level = "info", skip_all, fields(source = %source.name))]
    pub async fn fetch_source(&self, source: &SourceDescriptor) -> Vec<Article> {
        let fetched = match source.kind {
            SourceKind::Rss => self.fetcher.fetch(&source.url).await,
        };
        match fetched {
            Ok(entries) => {
                let fetched = entries.len();
                let articles: Vec<Article> = entries
                    .into_iter()
                    .take(MAX_ENTRIES_PER_SOURCE)
                    .filter_map(|entry| normalize_entry(entry, source))
                    .collect();
                info!(fetched, kept = articles.len(), "Fetched source");
                articles
            }
            Err(e) => {
                warn!(url = %source.url, error = %e, "Source fetch failed; skipping");
                Vec::new()
            }
        }
    }

    /// Fetch every source in order and concatenate the results.
    #[instrument(level = "info", skip_all, fields(sources = self.sources.len()))]
    pub async fn collect(&self) -> Vec<Article> {
        let mut all = Vec::new();
        for (i, source) in self.sources.iter().enumerate() {
            if i > 0 && !self.delay.is_zero() {
                sleep(self.delay).await;
            }
            debug!(source = %source.name, "Fetching source");
            all.extend(self.fetch_source(source).await);
        }
        info!(count = all.len(), "Collected articles from all sources");
        all
    }

    /// Collect all sources and archive the batch under `now`'s date.
    ///
    /// Writes `{date}.json` and `latest.json` (replacing them) and records the
    /// date in `index.json`. Only file system errors are returned.
    #[instrument(level = "info", skip_all, fields(data_dir = %data_dir.display()))]
    pub async fn run(
        &self,
        data_dir: &Path,
        now: DateTime<FixedOffset>,
    ) -> Result<IngestOutcome, Box<dyn Error>> {
        let articles = self.collect().await;
        let snapshot = DailySnapshot::new(archive_date(&now), archive_timestamp(&now), articles);

        json::write_snapshot(&snapshot, data_dir).await?;
        let index = indexes::update_index(data_dir, &snapshot.date).await?;

        info!(date = %snapshot.date, total = snapshot.total, "Ingest archived");
        Ok(IngestOutcome { snapshot, index })
    }
}

/// Read the current `latest.json` for the run log.
///
/// A missing or unreadable file yields `None`; the run goes on to replace it.
#[instrument(level = "debug", skip_all, fields(data_dir = %data_dir.display()))]
pub async fn peek_latest(data_dir: &Path) -> Option<DailySnapshot> {
    match json::load_latest(data_dir).await {
        Ok(previous) => previous,
        Err(e) => {
            warn!(error = %e, "Unreadable latest snapshot; it will be replaced");
            None
        }
    }
}

/// Resolve `link` against the feed URL when it is relative.
fn resolve_link(link: &str, feed_url: &str) -> String {
    if Url::parse(link).is_ok() {
        return link.to_string();
    }
    Url::parse(feed_url)
        .and_then(|base| base.join(link))
        .map(|u| u.to_string())
        .unwrap_or_else(|_| link.to_string())
}

/// Turn a raw entry into an [`Article`], or `None` if it lacks a title or link.
pub fn normalize_entry(entry: FeedEntry, source: &SourceDescriptor) -> Option<Article> {
    let title = entry.title.as_deref().unwrap_or_default().trim().to_string();
    let link = entry.link.as_deref().unwrap_or_default().trim().to_string();
    if title.is_empty() || link.is_empty() {
        debug!(
            title = %truncate_for_log(&title, 80),
            link = %truncate_for_log(&link, 80),
            "Dropping entry without title or link"
        );
        return None;
    }

    let summary = entry.summary.or(entry.description).unwrap_or_default();
    let published = entry.published.or(entry.updated).unwrap_or_default();

    Some(Article {
        title,
        url: resolve_link(&link, &source.url),
        summary: clean_html(&summary),
        source: source.name.clone(),
        category: source.category.clone(),
        icon: source.icon.clone(),
        published,
    })
}
