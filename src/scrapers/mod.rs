//! Feed fetching for the ingest pipeline.
//!
//! Every source is reached through the [`FetchFeed`] capability: given a feed
//! URL it returns the raw entries of that feed. The production implementation,
//! [`HttpFeedFetcher`], downloads the document with `reqwest` and hands it to
//! [`feed::parse_feed`], which understands RSS 2.0, RSS 1.0 (RDF) and Atom.
//!
//! # Failure Model
//!
//! Implementations report any transport or parse problem as an error. The
//! caller decides what a failure means; the ingest loop logs it and moves on
//! to the next source.

pub mod feed;

use crate::models::FeedEntry;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use std::error::Error;
use std::time::Instant;
use tracing::{debug, instrument};

/// Browser-like agent string; several feed hosts reject unknown clients.
const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Capability that turns a feed URL into its raw entries.
pub trait FetchFeed {
    /// Fetch and parse the feed at `url`.
    ///
    /// Entries are returned in document order, uncapped.
    async fn fetch(&self, url: &str) -> Result<Vec<FeedEntry>, Box<dyn Error>>;
}

/// [`FetchFeed`] over HTTP(S).
#[derive(Debug, Clone)]
pub struct HttpFeedFetcher {
    client: reqwest::Client,
}

impl HttpFeedFetcher {
    pub fn new() -> Result<Self, Box<dyn Error>> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));
        let client = reqwest::Client::builder().default_headers(headers).build()?;
        Ok(Self { client })
    }
}

impl FetchFeed for HttpFeedFetcher {
    #[instrument(level = "info", skip(self))]
    async fn fetch(&self, url: &str) -> Result<Vec<FeedEntry>, Box<dyn Error>> {
        let t0 = Instant::now();
        let body = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        debug!(
            bytes = body.len(),
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "Downloaded feed"
        );
        feed::parse_feed(&body)
    }
}
