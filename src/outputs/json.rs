//! Snapshot persistence.
//!
//! Each ingest run writes the same serialized [`DailySnapshot`] twice:
//! ```text
//! data_dir/
//! ├── 2024-01-03.json   # dated snapshot, replaced on re-run
//! ├── latest.json       # always the most recent run
//! └── index.json        # see [`super::indexes`]
//! ```
//!
//! Writes replace existing files; nothing is appended.

use crate::models::DailySnapshot;
use std::error::Error;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, error, info, instrument};

/// File name of the rolling "latest" pointer.
pub const LATEST_FILE: &str = "latest.json";

/// Path of the dated snapshot for `date`.
pub fn snapshot_path(data_dir: &Path, date: &str) -> PathBuf {
    data_dir.join(format!("{date}.json"))
}

/// Write a snapshot as both its dated file and `latest.json`.
///
/// Creates `data_dir` if needed.
///
/// # Returns
///
/// The path of the dated snapshot file.
#[instrument(level = "info", skip_all, fields(data_dir = %data_dir.display(), date = %snapshot.date))]
pub async fn write_snapshot(
    snapshot: &DailySnapshot,
    data_dir: &Path,
) -> Result<PathBuf, Box<dyn Error>> {
    let json = serde_json::to_string_pretty(snapshot)?;

    if let Err(e) = fs::create_dir_all(data_dir).await {
        error!(error = %e, "Failed to create data dir");
        return Err(e.into());
    }

    let dated = snapshot_path(data_dir, &snapshot.date);
    fs::write(&dated, &json).await?;
    info!(path = %dated.display(), total = snapshot.total, "Wrote dated snapshot");

    let latest = data_dir.join(LATEST_FILE);
    fs::write(&latest, &json).await?;
    info!(path = %latest.display(), "Updated latest snapshot");

    Ok(dated)
}

async fn read_snapshot(path: &Path) -> Result<Option<DailySnapshot>, Box<dyn Error>> {
    if !fs::try_exists(path).await? {
        debug!(path = %path.display(), "Snapshot not found");
        return Ok(None);
    }
    let raw = fs::read_to_string(path).await?;
    Ok(Some(serde_json::from_str(&raw)?))
}

/// Load the snapshot archived for `date`, or `None` if it is missing.
pub async fn load_snapshot(
    data_dir: &Path,
    date: &str,
) -> Result<Option<DailySnapshot>, Box<dyn Error>> {
    read_snapshot(&snapshot_path(data_dir, date)).await
}

/// Load `latest.json`, or `None` if nothing has been ingested yet.
pub async fn load_latest(data_dir: &Path) -> Result<Option<DailySnapshot>, Box<dyn Error>> {
    read_snapshot(&data_dir.join(LATEST_FILE)).await
}
