//! Data models shared by the ingest and publish pipelines.
//!
//! This module defines the records that flow through the application:
//! - [`SourceDescriptor`]: Static description of one feed endpoint
//! - [`FeedEntry`]: A raw entry as parsed from an RSS or Atom document
//! - [`Article`]: A normalized article tagged with its source metadata
//! - [`DailySnapshot`]: One day's aggregated articles, persisted as JSON
//! - [`DateIndex`]: The bounded, most-recent-first list of archived dates

use serde::{Deserialize, Serialize};

/// Maximum number of dates kept in the [`DateIndex`].
pub const MAX_INDEXED_DATES: usize = 30;

/// The kind of endpoint a source points at.
///
/// Only feeds are supported today. RSS 2.0 and Atom documents are both
/// handled by the same parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Rss,
}

/// Static configuration identifying one feed endpoint and its display metadata.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SourceDescriptor {
    /// Display name, also written into each article's `source` field.
    pub name: String,
    /// Feed URL.
    pub url: String,
    /// Endpoint kind.
    pub kind: SourceKind,
    /// Category label used to group articles on the rendered page.
    pub category: String,
    /// Icon glyph shown in the source badge.
    pub icon: String,
}

/// A raw feed entry before normalization.
///
/// Fields mirror what feeds actually carry; absent elements stay `None` so
/// the ingest step can apply its fallbacks (`summary` → `description`,
/// `published` → `updated`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedEntry {
    pub title: Option<String>,
    pub link: Option<String>,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub published: Option<String>,
    pub updated: Option<String>,
}

/// A normalized article ready to be archived and rendered.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Article {
    pub title: String,
    pub url: String,
    /// Plain text, markup stripped, at most 300 characters.
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub icon: String,
    /// Free-form timestamp as reported by the feed; may be empty.
    #[serde(default)]
    pub published: String,
}

/// The persisted record of one day's aggregated articles.
///
/// Written to `{data_dir}/{date}.json` and `{data_dir}/latest.json`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct DailySnapshot {
    /// Archive date in `YYYY-MM-DD` format (UTC+8).
    pub date: String,
    /// RFC 3339 timestamp of the ingest run (UTC+8).
    pub generated_at: String,
    /// Number of articles in `articles`.
    pub total: usize,
    /// Articles in source-declaration order.
    #[serde(default)]
    pub articles: Vec<Article>,
}

impl DailySnapshot {
    pub fn new(date: String, generated_at: String, articles: Vec<Article>) -> Self {
        Self {
            date,
            generated_at,
            total: articles.len(),
            articles,
        }
    }
}

/// Ordered list of archived dates, most recent first.
///
/// Never holds duplicates and never exceeds [`MAX_INDEXED_DATES`] entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct DateIndex {
    #[serde(default)]
    pub dates: Vec<String>,
}

impl DateIndex {
    /// Record a freshly archived date.
    ///
    /// A new date goes to the front and the oldest entries beyond the cap are
    /// dropped. A date that is already present keeps its current position.
    ///
    /// Returns `true` if the index changed.
    pub fn record(&mut self, date: &str) -> bool {
        if self.dates.iter().any(|d| d == date) {
            return false;
        }
        self.dates.insert(0, date.to_string());
        self.dates.truncate(MAX_INDEXED_DATES);
        true
    }

    /// The most recently archived date, if any.
    pub fn latest(&self) -> Option<&str> {
        self.dates.first().map(String::as_str)
    }

    /// Up to `n` of the most recent dates.
    pub fn recent(&self, n: usize) -> &[String] {
        &self.dates[..self.dates.len().min(n)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article(title: &str) -> Article {
        Article {
            title: title.to_string(),
            url: "https://example.com/a".to_string(),
            summary: String::new(),
            source: "A".to_string(),
            category: "综合科技".to_string(),
            icon: "🔶".to_string(),
            published: String::new(),
        }
    }

    #[test]
    fn test_snapshot_total_matches_articles() {
        let snapshot = DailySnapshot::new(
            "2024-01-03".to_string(),
            "2024-01-03T08:00:00.000000+08:00".to_string(),
            vec![article("one"), article("two")],
        );
        assert_eq!(snapshot.total, 2);
    }

    #[test]
    fn test_snapshot_json_shape() {
        let snapshot = DailySnapshot::new(
            "2024-01-03".to_string(),
            "2024-01-03T08:00:00+08:00".to_string(),
            vec![article("one")],
        );
        let value = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(value["date"], "2024-01-03");
        assert_eq!(value["total"], 1);
        let keys: Vec<&str> = value["articles"][0]
            .as_object()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        for key in ["title", "url", "summary", "source", "category", "icon", "published"] {
            assert!(keys.contains(&key), "missing {key}");
        }
    }

    #[test]
    fn test_article_missing_optional_fields() {
        let json = r#"{"title": "T", "url": "https://example.com"}"#;
        let article: Article = serde_json::from_str(json).unwrap();
        assert_eq!(article.summary, "");
        assert_eq!(article.category, "");
    }

    #[test]
    fn test_source_kind_serializes_lowercase() {
        let yaml = serde_yaml::to_string(&SourceKind::Rss).unwrap();
        assert_eq!(yaml.trim(), "rss");
    }

    #[test]
    fn test_index_record_new_date_goes_first() {
        let mut index = DateIndex {
            dates: vec!["2024-01-02".to_string(), "2024-01-01".to_string()],
        };
        assert!(index.record("2024-01-03"));
        assert_eq!(index.dates, vec!["2024-01-03", "2024-01-02", "2024-01-01"]);
        assert_eq!(index.latest(), Some("2024-01-03"));
    }

    #[test]
    fn test_index_record_present_date_keeps_position() {
        let mut index = DateIndex {
            dates: vec![
                "2024-01-03".to_string(),
                "2024-01-02".to_string(),
                "2024-01-01".to_string(),
            ],
        };
        assert!(!index.record("2024-01-02"));
        assert_eq!(index.dates, vec!["2024-01-03", "2024-01-02", "2024-01-01"]);
    }

    #[test]
    fn test_index_is_capped() {
        let mut index = DateIndex::default();
        for day in 1..=40 {
            index.record(&format!("2024-01-{day:02}"));
        }
        assert_eq!(index.dates.len(), MAX_INDEXED_DATES);
        assert_eq!(index.dates.first().unwrap(), "2024-01-40");
        assert_eq!(index.dates.last().unwrap(), "2024-01-11");

        let mut unique = index.dates.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), index.dates.len());
    }

    #[test]
    fn test_index_recent() {
        let index = DateIndex {
            dates: (1..=12).rev().map(|d| format!("2024-01-{d:02}")).collect(),
        };
        assert_eq!(index.recent(10).len(), 10);
        assert_eq!(index.recent(10)[0], "2024-01-12");
        assert_eq!(DateIndex::default().recent(10).len(), 0);
        assert_eq!(DateIndex::default().latest(), None);
    }
}
