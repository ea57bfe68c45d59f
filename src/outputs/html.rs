//! Static HTML rendering.
//!
//! Rendering is pure: the same snapshot, index and [`Site`] always produce the
//! same text. Nothing here touches the file system; see [`crate::publish`].
//!
//! # Page Layout
//!
//! ```text
//! header       site title and tagline
//! nav          up to 10 most recent archive dates, current one active
//! main         date heading, meta line, one section per category
//! footer       source credits
//! ```
//!
//! All feed-provided text is escaped; URLs are escaped for attribute context.

use crate::models::{Article, DailySnapshot, DateIndex};
use html_escape::{encode_double_quoted_attribute, encode_text};
use itertools::Itertools;

/// Number of dates listed in the navigation strip.
pub const NAV_DATES: usize = 10;

const SITE_TITLE: &str = "科技日报";
const DEFAULT_CATEGORY: &str = "其他";
const DEFAULT_ICON: &str = "📰";

/// Site-wide rendering settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Site {
    /// URL prefix the output directory is served under, e.g. `/TechNews`.
    pub base_path: String,
    /// Source names credited in the footer, in display order.
    pub source_names: Vec<String>,
}

impl Site {
    pub fn new(base_path: &str, source_names: Vec<String>) -> Self {
        Self {
            base_path: base_path.trim_end_matches('/').to_string(),
            source_names,
        }
    }

    /// Site-relative URL of the page for `date`.
    pub fn page_href(&self, date: &str) -> String {
        format!("{}/{}.html", self.base_path, date)
    }

    fn asset_href(&self, file: &str) -> String {
        format!("{}/assets/{}", self.base_path, file)
    }
}

/// Group articles by category.
///
/// Categories appear in first-seen order and articles keep their order within
/// each category. Articles without a category land in `其他`.
pub fn group_by_category(articles: &[Article]) -> Vec<(&str, Vec<&Article>)> {
    let mut groups: Vec<(&str, Vec<&Article>)> = Vec::new();
    for article in articles {
        let category = if article.category.is_empty() {
            DEFAULT_CATEGORY
        } else {
            article.category.as_str()
        };
        match groups.iter_mut().find(|(c, _)| *c == category) {
            Some((_, members)) => members.push(article),
            None => groups.push((category, vec![article])),
        }
    }
    groups
}

/// Render one article card.
pub fn render_article_card(article: &Article) -> String {
    let url = if article.url.is_empty() { "#" } else { article.url.as_str() };
    let icon = if article.icon.is_empty() { DEFAULT_ICON } else { article.icon.as_str() };
    let summary_html = if article.summary.is_empty() {
        String::new()
    } else {
        format!(r#"<p class="summary">{}</p>"#, encode_text(&article.summary))
    };
    format!(
        r#"
    <article class="card">
      <h3><a href="{url}" target="_blank" rel="noopener">{title}</a></h3>
      {summary_html}
      <footer><span class="source-badge">{icon} {source}</span></footer>
    </article>"#,
        url = encode_double_quoted_attribute(url),
        title = encode_text(&article.title),
        icon = encode_text(icon),
        source = encode_text(&article.source),
    )
}

/// Render a category heading with its cards.
pub fn render_category_section(category: &str, articles: &[&Article]) -> String {
    let cards: String = articles.iter().map(|a| render_article_card(a)).collect();
    format!(
        r#"
  <section class="category-section">
    <h2 class="category-title">{} <span class="count">({})</span></h2>
    <div class="cards-grid">{}
    </div>
  </section>"#,
        encode_text(category),
        articles.len(),
        cards
    )
}

/// Render the navigation strip: the most recent [`NAV_DATES`] dates, `current` active.
pub fn render_date_nav(site: &Site, index: &DateIndex, current: &str) -> String {
    index
        .recent(NAV_DATES)
        .iter()
        .map(|d| {
            let active = if d == current { r#" class="active""# } else { "" };
            format!(
                r#"<a href="{}"{}>{}</a>"#,
                encode_double_quoted_attribute(&site.page_href(d)),
                active,
                encode_text(d)
            )
        })
        .join("\n      ")
}

/// `2024-01-03T08:00:00.123456+08:00` → `2024-01-03 08:00:00`.
fn display_time(generated_at: &str) -> String {
    generated_at.chars().take(19).collect::<String>().replace('T', " ")
}

/// Render the full page for one archived date.
pub fn render_page(site: &Site, snapshot: &DailySnapshot, index: &DateIndex) -> String {
    let date = encode_text(&snapshot.date);
    let sections: String = group_by_category(&snapshot.articles)
        .iter()
        .map(|(category, articles)| render_category_section(category, articles))
        .collect();
    let nav_html = render_date_nav(site, index, &snapshot.date);
    let credits = site.source_names.iter().map(|n| encode_text(n)).join(" · ");

    format!(
        r#"<!DOCTYPE html>
<html lang="zh-CN">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>{SITE_TITLE} · {date}</title>
  <link rel="stylesheet" href="{style}">
  <link rel="icon" href="data:image/svg+xml,<svg xmlns='http://www.w3.org/2000/svg' viewBox='0 0 100 100'><text y='.9em' font-size='90'>📡</text></svg>">
</head>
<body>
  <header class="site-header">
    <div class="header-inner">
      <div class="logo">📡 {SITE_TITLE}</div>
      <p class="tagline">每日科技圈精选资讯 · 北京时间早 8 点更新</p>
    </div>
  </header>

  <nav class="date-nav">
    <div class="nav-inner">
      <span class="nav-label">历史存档：</span>
      {nav_html}
    </div>
  </nav>

  <main class="main-content">
    <div class="page-meta">
      <h1 class="page-date">📅 {date}</h1>
      <p class="meta-info">共收录 <strong>{total}</strong> 条资讯 · 更新于 {generated} CST</p>
      <input id="search-input" class="search-input" type="search" placeholder="搜索标题或摘要…">
    </div>
    {sections}
  </main>

  <footer class="site-footer">
    <p>数据来源：{credits}</p>
  </footer>

  <script src="{script}"></script>
</body>
</html>
"#,
        style = encode_double_quoted_attribute(&site.asset_href("style.css")),
        script = encode_double_quoted_attribute(&site.asset_href("app.js")),
        total = snapshot.articles.len(),
        generated = encode_text(&display_time(&snapshot.generated_at)),
    )
}

/// Render the redirect page that forwards to `latest`'s page.
pub fn render_redirect(site: &Site, latest: &str) -> String {
    let href = site.page_href(latest);
    format!(
        r#"<!DOCTYPE html>
<html lang="zh-CN">
<head>
  <meta charset="UTF-8">
  <meta http-equiv="refresh" content="0; url={attr}">
  <title>{SITE_TITLE}</title>
  <script>location.replace({js});</script>
</head>
<body></body>
</html>
"#,
        attr = encode_double_quoted_attribute(&href),
        js = serde_json::Value::String(href.clone()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article(title: &str, category: &str) -> Article {
        Article {
            title: title.to_string(),
            url: format!("https://example.com/{}", title.len()),
            summary: String::new(),
            source: "A".to_string(),
            category: category.to_string(),
            icon: "🔶".to_string(),
            published: String::new(),
        }
    }

    fn site() -> Site {
        Site::new("/TechNews/", vec!["A".to_string(), "B".to_string()])
    }

    fn index(dates: &[&str]) -> DateIndex {
        DateIndex {
            dates: dates.iter().map(|d| d.to_string()).collect(),
        }
    }

    #[test]
    fn test_group_preserves_first_seen_order() {
        let articles = vec![
            article("a1", "X"),
            article("b1", "Y"),
            article("a2", "X"),
            article("c1", ""),
        ];
        let groups = group_by_category(&articles);
        let names: Vec<&str> = groups.iter().map(|(c, _)| *c).collect();
        assert_eq!(names, vec!["X", "Y", "其他"]);
        let x_titles: Vec<&str> = groups[0].1.iter().map(|a| a.title.as_str()).collect();
        assert_eq!(x_titles, vec!["a1", "a2"]);
    }

    #[test]
    fn test_card_escapes_title_and_summary() {
        let mut a = article("<script>alert(1)</script>", "X");
        a.summary = "1 < 2 > 0".to_string();
        let html = render_article_card(&a);
        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
        assert!(!html.contains("<script>"));
        assert!(html.contains(r#"<p class="summary">1 &lt; 2 &gt; 0</p>"#));
    }

    #[test]
    fn test_card_without_summary_or_icon() {
        let mut a = article("t", "X");
        a.icon.clear();
        let html = render_article_card(&a);
        assert!(!html.contains("class=\"summary\""));
        assert!(html.contains("📰 A"));
    }

    #[test]
    fn test_card_escapes_url_attribute() {
        let mut a = article("t", "X");
        a.url = r#"https://example.com/?q="x""#.to_string();
        let html = render_article_card(&a);
        assert!(html.contains(r#"href="https://example.com/?q=&quot;x&quot;""#));
    }

    #[test]
    fn test_nav_marks_current_and_caps() {
        let dates: Vec<String> = (1..=12).rev().map(|d| format!("2024-01-{d:02}")).collect();
        let idx = DateIndex { dates };
        let nav = render_date_nav(&site(), &idx, "2024-01-05");
        assert_eq!(nav.matches("<a ").count(), NAV_DATES);
        assert!(nav.contains(r#"<a href="/TechNews/2024-01-05.html" class="active">2024-01-05</a>"#));
        assert!(nav.contains(r#"<a href="/TechNews/2024-01-12.html">2024-01-12</a>"#));
        assert!(!nav.contains("2024-01-02"));
        assert_eq!(nav.matches("class=\"active\"").count(), 1);
    }

    #[test]
    fn test_page_contents() {
        let snapshot = DailySnapshot::new(
            "2024-01-03".to_string(),
            "2024-01-03T08:00:01.123456+08:00".to_string(),
            vec![article("a1", "X"), article("b1", "Y")],
        );
        let html = render_page(&site(), &snapshot, &index(&["2024-01-03", "2024-01-02"]));
        assert!(html.contains("<title>科技日报 · 2024-01-03</title>"));
        assert!(html.contains("共收录 <strong>2</strong> 条资讯 · 更新于 2024-01-03 08:00:01 CST"));
        assert!(html.contains(r#"href="/TechNews/assets/style.css""#));
        assert!(html.contains(r#"src="/TechNews/assets/app.js""#));
        assert!(html.contains("数据来源：A · B"));
        assert!(html.find(">X <span").unwrap() < html.find(">Y <span").unwrap());
    }

    #[test]
    fn test_page_is_deterministic() {
        let snapshot = DailySnapshot::new(
            "2024-01-03".to_string(),
            "2024-01-03T08:00:00+08:00".to_string(),
            vec![article("a1", "X")],
        );
        let idx = index(&["2024-01-03"]);
        assert_eq!(
            render_page(&site(), &snapshot, &idx),
            render_page(&site(), &snapshot, &idx)
        );
    }

    #[test]
    fn test_redirect_targets_latest() {
        let html = render_redirect(&site(), "2024-01-03");
        assert!(html.contains(r#"location.replace("/TechNews/2024-01-03.html");"#));
        assert!(html.contains(r#"content="0; url=/TechNews/2024-01-03.html""#));
    }

    #[test]
    fn test_display_time() {
        assert_eq!(
            display_time("2024-01-03T08:00:00.123456+08:00"),
            "2024-01-03 08:00:00"
        );
        assert_eq!(display_time(""), "");
    }
}
