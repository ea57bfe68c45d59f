//! Date index file management.
//!
//! `index.json` holds the archived dates, most recent first:
//!
//! ```json
//! { "dates": ["2024-01-03", "2024-01-02", "2024-01-01"] }
//! ```
//!
//! It drives both archive retention (at most 30 dates) and the navigation
//! strip of every rendered page.
//!
//! # Presence, Not Recency
//!
//! Re-ingesting a date that is already listed leaves the index untouched: the
//! date is not moved back to the front.

use crate::models::DateIndex;
use std::error::Error;
use std::path::Path;
use tokio::fs;
use tracing::{debug, info, instrument};

/// File name of the date index inside the data directory.
pub const INDEX_FILE: &str = "index.json";

/// Load the date index, or an empty one if the file does not exist.
#[instrument(level = "debug", skip_all, fields(data_dir = %data_dir.display()))]
pub async fn load_index(data_dir: &Path) -> Result<DateIndex, Box<dyn Error>> {
    let path = data_dir.join(INDEX_FILE);
    if !fs::try_exists(&path).await? {
        debug!(path = %path.display(), "No date index yet");
        return Ok(DateIndex::default());
    }
    let raw = fs::read_to_string(&path).await?;
    Ok(serde_json::from_str(&raw)?)
}

/// Record `date` in the index file and write it back.
///
/// The file is always rewritten, even when the date was already present.
///
/// # Returns
///
/// The index as written.
#[instrument(level = "info", skip_all, fields(data_dir = %data_dir.display(), %date))]
pub async fn update_index(data_dir: &Path, date: &str) -> Result<DateIndex, Box<dyn Error>> {
    let mut index = load_index(data_dir).await?;
    let inserted = index.record(date);

    fs::create_dir_all(data_dir).await?;
    let path = data_dir.join(INDEX_FILE);
    fs::write(&path, serde_json::to_string_pretty(&index)?).await?;
    info!(
        path = %path.display(),
        inserted,
        dates = index.dates.len(),
        "Updated date index"
    );
    Ok(index)
}
