//! Feed source configuration.
//!
//! The built-in list covers eight tech-news feeds. Order matters: it is the
//! order sources are fetched in and therefore the order articles (and
//! categories) appear on the rendered page.
//!
//! A YAML file may replace the built-in list:
//!
//! ```yaml
//! - name: Hacker News
//!   url: https://news.ycombinator.com/rss
//!   kind: rss
//!   category: 综合科技
//!   icon: "🔶"
//! ```

use crate::models::{SourceDescriptor, SourceKind};
use once_cell::sync::Lazy;
use std::error::Error;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument};
use url::Url;

fn source(name: &str, url: &str, category: &str, icon: &str) -> SourceDescriptor {
    SourceDescriptor {
        name: name.to_string(),
        url: url.to_string(),
        kind: SourceKind::Rss,
        category: category.to_string(),
        icon: icon.to_string(),
    }
}

/// The compiled-in feed list.
pub static DEFAULT_SOURCES: Lazy<Vec<SourceDescriptor>> = Lazy::new(|| {
    vec![
        source("Hacker News", "https://news.ycombinator.com/rss", "综合科技", "🔶"),
        source("The Verge", "https://www.theverge.com/rss/index.xml", "科技资讯", "📱"),
        source("TechCrunch", "https://techcrunch.com/feed/", "创业科技", "🚀"),
        source("Wired", "https://www.wired.com/feed/rss", "科技文化", "⚡"),
        source("MIT Technology Review", "https://www.technologyreview.com/feed/", "前沿技术", "🔬"),
        source("Ars Technica", "https://feeds.arstechnica.com/arstechnica/index", "深度科技", "🖥️"),
        source("36氪", "https://36kr.com/feed", "国内科技", "🇨🇳"),
        source("少数派", "https://sspai.com/feed", "数字生活", "📲"),
    ]
});

/// Parse a YAML source list and validate every URL.
pub fn parse_sources(yaml: &str) -> Result<Vec<SourceDescriptor>, Box<dyn Error>> {
    let sources: Vec<SourceDescriptor> = serde_yaml::from_str(yaml)?;
    for s in &sources {
        Url::parse(&s.url).map_err(|e| format!("source {:?} has invalid url {:?}: {e}", s.name, s.url))?;
    }
    Ok(sources)
}

/// Load the source list, falling back to [`DEFAULT_SOURCES`] when no file is given.
#[instrument(level = "info")]
pub async fn load_sources(path: Option<&Path>) -> Result<Vec<SourceDescriptor>, Box<dyn Error>> {
    let Some(path) = path else {
        return Ok(DEFAULT_SOURCES.clone());
    };
    let yaml = fs::read_to_string(path).await?;
    let sources = parse_sources(&yaml)?;
    info!(count = sources.len(), path = %path.display(), "Loaded source list");
    Ok(sources)
}
