//! RSS and Atom document parsing.
//!
//! Documents are handed to `feed-rs`, which detects the format (RSS 0.9x/1.0/2.0,
//! Atom, JSON Feed) and normalizes it into one model. This module maps that
//! model onto [`FeedEntry`]:
//!
//! | `FeedEntry` | `feed_rs` entry |
//! |-------------|-----------------|
//! | `title` | `title` |
//! | `link` | alternate link, else first link |
//! | `summary` | `summary` (RSS `description`, Atom `summary`) |
//! | `description` | `content` body (RSS `content:encoded`, Atom `content`) |
//! | `published` | `published` (RSS `pubDate` / `dc:date`), RFC 3339 |
//! | `updated` | `updated`, RFC 3339 |

use crate::models::FeedEntry;
use chrono::{DateTime, Utc};
use feed_rs::model::Entry;
use feed_rs::parser;
use std::error::Error;

fn to_rfc3339(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339()
}

impl From<Entry> for FeedEntry {
    fn from(entry: Entry) -> Self {
        // Prefer the alternate link (explicit or implied), else whatever comes first.
        let link = entry
            .links
            .iter()
            .find(|l| matches!(l.rel.as_deref(), None | Some("alternate")))
            .or_else(|| entry.links.first())
            .map(|l| l.href.clone());

        FeedEntry {
            title: entry.title.map(|t| t.content),
            link,
            summary: entry.summary.map(|t| t.content),
            description: entry.content.and_then(|c| c.body),
            published: entry.published.map(to_rfc3339),
            updated: entry.updated.map(to_rfc3339),
        }
    }
}

/// Parse a feed document into raw entries, in document order.
pub fn parse_feed(xml: &str) -> Result<Vec<FeedEntry>, Box<dyn Error>> {
    let feed = parser::parse(xml.as_bytes())?;
    Ok(feed.entries.into_iter().map(FeedEntry::from).collect())
}
