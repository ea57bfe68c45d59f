//! The publish pipeline: render every archived date into a static site.
//!
//! # Output Structure
//!
//! ```text
//! out_dir/
//! ├── 2024-01-03.html   # one page per archived date
//! ├── 2024-01-02.html
//! ├── index.html        # redirect to the most recent date
//! └── assets/           # copied from the assets source directory
//! ```
//!
//! Publishing is idempotent: an unchanged data directory yields byte-identical
//! pages. A missing or empty date index means there is nothing to publish and
//! no output is produced at all.

use crate::outputs::html::{self, Site};
use crate::outputs::{indexes, json};
use std::error::Error;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info, instrument};

/// Where things go and come from for one publish run.
#[derive(Debug, Clone)]
pub struct PublishPaths {
    pub data_dir: PathBuf,
    pub out_dir: PathBuf,
    pub assets_dir: PathBuf,
}

/// What a publish run produced.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct PublishReport {
    /// Pages written, in index order.
    pub pages: Vec<PathBuf>,
    /// Dates listed in the index whose snapshot was missing.
    pub skipped: Vec<String>,
    /// Target date of the redirect page, if one was written.
    pub redirect_to: Option<String>,
    /// Number of asset files copied.
    pub assets_copied: usize,
}

/// Render all archived dates, the redirect page and the assets.
#[instrument(level = "info", skip_all, fields(data_dir = %paths.data_dir.display(), out_dir = %paths.out_dir.display()))]
pub async fn run(paths: &PublishPaths, site: &Site) -> Result<PublishReport, Box<dyn Error>> {
    let mut report = PublishReport::default();

    let index = indexes::load_index(&paths.data_dir).await?;
    let Some(latest) = index.latest() else {
        info!("Date index is empty; nothing to publish");
        return Ok(report);
    };
    info!(dates = index.dates.len(), "Found archived dates");

    fs::create_dir_all(&paths.out_dir).await?;

    for date in &index.dates {
        let Some(snapshot) = json::load_snapshot(&paths.data_dir, date).await? else {
            debug!(%date, "Snapshot missing; skipping date");
            report.skipped.push(date.clone());
            continue;
        };
        let out_path = paths.out_dir.join(format!("{date}.html"));
        fs::write(&out_path, html::render_page(site, &snapshot, &index)).await?;
        info!(path = %out_path.display(), articles = snapshot.total, "Rendered page");
        report.pages.push(out_path);
    }

    let redirect = paths.out_dir.join("index.html");
    fs::write(&redirect, html::render_redirect(site, latest)).await?;
    info!(path = %redirect.display(), target = %latest, "Rendered redirect");
    report.redirect_to = Some(latest.to_string());

    report.assets_copied = copy_assets(&paths.assets_dir, &paths.out_dir.join("assets")).await?;

    Ok(report)
}

/// Copy `src` recursively into `dst`, overwriting existing files.
///
/// A missing `src` is not an error; nothing is copied.
///
/// # Returns
///
/// The number of files copied.
#[instrument(level = "info", skip_all, fields(src = %src.display(), dst = %dst.display()))]
pub async fn copy_assets(src: &Path, dst: &Path) -> Result<usize, Box<dyn Error>> {
    if !fs::try_exists(src).await? {
        debug!("No assets directory; skipping copy");
        return Ok(0);
    }

    let mut copied = 0;
    let mut pending = vec![(src.to_path_buf(), dst.to_path_buf())];
    while let Some((from_dir, to_dir)) = pending.pop() {
        fs::create_dir_all(&to_dir).await?;
        let mut entries = fs::read_dir(&from_dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let from = entry.path();
            let to = to_dir.join(entry.file_name());
            if entry.file_type().await?.is_dir() {
                pending.push((from, to));
            } else {
                fs::copy(&from, &to).await?;
                copied += 1;
            }
        }
    }
    info!(files = copied, "Copied assets");
    Ok(copied)
}
