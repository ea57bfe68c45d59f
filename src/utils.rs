//! Utility functions for archive time, text cleanup, and file system checks.
//!
//! This module provides helper functions used throughout the application:
//! - Archive clock helpers pinned to the fixed UTC+8 archive timezone
//! - Summary sanitization (markup stripping, whitespace collapse, truncation)
//! - String truncation for log previews
//! - File system validation for output directories

use chrono::{DateTime, FixedOffset, SecondsFormat, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::Html;
use std::error::Error;
use std::fs as stdfs;
use std::path::Path;
use tokio::fs;
use tracing::{debug, info, instrument};

/// Maximum length of an article summary, in characters.
pub const SUMMARY_MAX_CHARS: usize = 300;

/// Fixed archive timezone (UTC+8). Date keys never depend on the host's zone.
pub static ARCHIVE_TZ: Lazy<FixedOffset> =
    Lazy::new(|| FixedOffset::east_opt(8 * 3600).expect("UTC+8 is a valid offset"));

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Current wall-clock time in the archive timezone.
pub fn archive_now() -> DateTime<FixedOffset> {
    Utc::now().with_timezone(&*ARCHIVE_TZ)
}

/// Snapshot date key (`YYYY-MM-DD`) for an instant, taken in the archive timezone.
pub fn archive_date(now: &DateTime<FixedOffset>) -> String {
    now.with_timezone(&*ARCHIVE_TZ).format("%Y-%m-%d").to_string()
}

/// RFC 3339 timestamp with microseconds and an explicit `+08:00` offset.
pub fn archive_timestamp(now: &DateTime<FixedOffset>) -> String {
    now.with_timezone(&*ARCHIVE_TZ)
        .to_rfc3339_opts(SecondsFormat::Micros, false)
}

/// Reduce an HTML fragment to a plain-text summary.
///
/// Markup is stripped and entities decoded, text nodes are joined with single
/// spaces, and the result is cut to [`SUMMARY_MAX_CHARS`] characters.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(clean_html("<p>Hello <b>world</b></p>"), "Hello world");
/// assert_eq!(clean_html(""), "");
/// ```
pub fn clean_html(fragment: &str) -> String {
    if fragment.trim().is_empty() {
        return String::new();
    }
    let mut text = strip_tags(fragment);
    // Double-escaped markup decodes into tags on the first pass.
    if text.contains('<') {
        text = strip_tags(&text);
    }
    let collapsed = WHITESPACE.replace_all(&text, " ");
    truncate_chars(&collapsed, SUMMARY_MAX_CHARS).trim_end().to_string()
}

fn strip_tags(fragment: &str) -> String {
    Html::parse_fragment(fragment)
        .root_element()
        .text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Keep at most `max` characters of `s`, never splitting a code point.
pub fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// Truncate a string for logging purposes.
///
/// Long strings are truncated to `max` characters with an ellipsis and
/// remaining character count appended.
pub fn truncate_for_log(s: &str, max: usize) -> String {
    let head = truncate_chars(s, max);
    if head.len() == s.len() {
        s.to_string()
    } else {
        format!("{}…(+{} chars)", head, s[head.len()..].chars().count())
    }
}

/// Ensure a directory exists and is writable.
///
/// This function creates the directory if it doesn't exist, then performs
/// a write test by creating and immediately deleting a probe file.
///
/// # Errors
///
/// Returns an error if:
/// - The directory cannot be created
/// - The directory is not writable (permission denied, read-only filesystem, etc.)
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn ensure_writable_dir(path: &Path) -> Result<(), Box<dyn Error>> {
    fs::create_dir_all(path).await?;
    // Try a small sync write using std fs (simpler error surface)
    let probe_path = path.join("..__probe_write__");
    match stdfs::File::create(&probe_path) {
        Ok(_) => {
            if let Err(e) = stdfs::remove_file(&probe_path) {
                debug!(path = %probe_path.display(), error = %e, "Could not remove probe file");
            }
            info!("Directory is writable");
            Ok(())
        }
        Err(e) => Err(Box::new(e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_clean_html_strips_markup() {
        assert_eq!(clean_html("<p>Hello <b>world</b></p>"), "Hello world");
        assert_eq!(
            clean_html("<div>\n  line one\n</div><div>line   two</div>"),
            "line one line two"
        );
        assert_eq!(clean_html("Fish &amp; chips"), "Fish & chips");
        assert_eq!(clean_html("   "), "");
    }

    #[test]
    fn test_clean_html_never_contains_tags() {
        let out = clean_html("<script>alert(1)</script><img src=x onerror=y><p>ok</p>");
        assert!(!out.contains('<'));
        assert!(!out.contains('>'));
        assert!(out.ends_with("ok"));
    }

    #[test]
    fn test_clean_html_strips_double_escaped_markup() {
        let summary = clean_html("&amp;lt;b&amp;gt;bold&amp;lt;/b&amp;gt; text");
        assert_eq!(summary, "bold text");
        assert!(!summary.contains('<'));
        assert_eq!(clean_html("<p>1 &lt; 2</p>"), "1 < 2");
    }

    #[test]
    fn test_clean_html_truncates_by_chars() {
        let long = format!("<p>{}</p>", "新".repeat(500));
        let out = clean_html(&long);
        assert_eq!(out.chars().count(), SUMMARY_MAX_CHARS);
    }

    #[test]
    fn test_truncate_chars() {
        assert_eq!(truncate_chars("hello", 10), "hello");
        assert_eq!(truncate_chars("hello", 2), "he");
        assert_eq!(truncate_chars("日本語", 2), "日本");
        assert_eq!(truncate_chars("", 2), "");
    }

    #[test]
    fn test_truncate_for_log() {
        assert_eq!(truncate_for_log("short", 100), "short");
        let result = truncate_for_log(&"a".repeat(500), 100);
        assert!(result.starts_with(&"a".repeat(100)));
        assert!(result.ends_with("…(+400 chars)"));
    }

    #[test]
    fn test_archive_date_uses_utc_plus_8() {
        // 2024-01-02 20:00 UTC is already 2024-01-03 in the archive timezone.
        let utc = Utc.with_ymd_and_hms(2024, 1, 2, 20, 0, 0).unwrap();
        let now = utc.with_timezone(&FixedOffset::east_opt(0).unwrap());
        assert_eq!(archive_date(&now), "2024-01-03");
        assert_eq!(archive_timestamp(&now), "2024-01-03T04:00:00.000000+08:00");
    }

    #[tokio::test]
    async fn test_ensure_writable_dir_creates_missing() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a/b");
        ensure_writable_dir(&nested).await.unwrap();
        assert!(nested.is_dir());
        assert!(!nested.join("..__probe_write__").exists());
    }
}
