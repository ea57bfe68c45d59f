//! Command-line interface definitions for Tech News Daily.
//!
//! This module defines the two run commands using the `clap` crate. Every
//! option has a default, so `tech_news_daily ingest` followed by
//! `tech_news_daily publish` is the whole daily workflow.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Command-line arguments for the Tech News Daily application.
///
/// # Examples
///
/// ```sh
/// # Fetch today's feeds into data/news
/// tech_news_daily ingest
///
/// # Render the archive into docs/TechNews
/// tech_news_daily publish
///
/// # Custom source list, no politeness delay
/// tech_news_daily ingest --sources sources.yaml --delay-ms 0
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Fetch all sources and archive today's snapshot
    Ingest(IngestArgs),
    /// Render archived snapshots into static HTML
    Publish(PublishArgs),
}

#[derive(clap::Args, Debug)]
pub struct IngestArgs {
    /// Directory holding dated snapshots, latest.json and index.json
    #[arg(short, long, default_value = "data/news")]
    pub data_dir: PathBuf,

    /// Optional YAML file replacing the built-in source list
    #[arg(short, long)]
    pub sources: Option<PathBuf>,

    /// Pause between two source fetches, in milliseconds
    #[arg(long, default_value_t = 1000)]
    pub delay_ms: u64,
}

#[derive(clap::Args, Debug)]
pub struct PublishArgs {
    /// Directory holding dated snapshots and index.json
    #[arg(short, long, default_value = "data/news")]
    pub data_dir: PathBuf,

    /// Directory the static site is written to
    #[arg(short, long, default_value = "docs/TechNews")]
    pub out_dir: PathBuf,

    /// Static assets copied into `<out_dir>/assets` when present
    #[arg(short, long, default_value = "assets")]
    pub assets_dir: PathBuf,

    /// URL prefix the site is served under
    #[arg(short, long, default_value = "/TechNews")]
    pub base_path: String,

    /// Optional YAML source list, used for the footer credits
    #[arg(short, long)]
    pub sources: Option<PathBuf>,
}
