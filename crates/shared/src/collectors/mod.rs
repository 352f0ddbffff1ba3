use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use tracing::debug;

use crate::models::NewsItem;

pub mod google_ai;
pub mod openai_news;

pub use google_ai::GoogleAiCollector;
pub use openai_news::OpenAiNewsCollector;

/// A source of news items. Implementations fetch however suits the source
/// (RSS, HTML scraping) and normalize to `NewsItem` records with UTC
/// ISO-8601 timestamps.
#[async_trait]
pub trait Collector: Send + Sync {
    fn source_name(&self) -> &str;

    async fn fetch_items(&self) -> Result<Vec<NewsItem>>;
}

/// The collectors wired into a daily run.
pub fn default_collectors() -> Result<Vec<Box<dyn Collector>>> {
    let collectors: Vec<Box<dyn Collector>> = vec![
        Box::new(OpenAiNewsCollector::new()?),
        Box::new(GoogleAiCollector::new()?),
    ];
    Ok(collectors)
}

/// Map feed entries to news items. Entries without a link or a publication
/// timestamp are skipped.
pub(crate) fn feed_items(body: &[u8], source: &str) -> Result<Vec<NewsItem>> {
    let feed = feed_rs::parser::parse(body).context("Failed to parse feed")?;

    let mut items = Vec::new();
    for entry in feed.entries {
        let Some(link) = entry.links.first() else {
            continue;
        };
        let Some(published) = entry.published.or(entry.updated) else {
            debug!("Skipping feed entry without timestamp: {}", link.href);
            continue;
        };
        let title = entry
            .title
            .map(|t| t.content)
            .unwrap_or_else(|| "Untitled".to_string());
        let description = entry.summary.and_then(|s| flatten_description(&s.content));

        items.push(NewsItem {
            title,
            url: link.href.clone(),
            published_at: published.to_rfc3339(),
            source: source.to_string(),
            description,
        });
    }
    Ok(items)
}

/// Feed descriptions often arrive as HTML fragments; flatten them to plain
/// text for storage and prompting.
pub(crate) fn flatten_description(raw: &str) -> Option<String> {
    let text = html2text::from_read(raw.as_bytes(), 100);
    let text = text.trim();
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

/// Normalize the timestamp shapes scraped pages produce to UTC RFC 3339.
pub(crate) fn to_iso(ts: &str) -> Option<String> {
    let trimmed = ts.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.with_timezone(&Utc).to_rfc3339());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(trimmed) {
        return Some(dt.with_timezone(&Utc).to_rfc3339());
    }
    for fmt in &["%Y-%m-%d", "%b %e, %Y", "%B %e, %Y"] {
        if let Ok(nd) = NaiveDate::parse_from_str(trimmed, fmt) {
            let midnight = nd.and_hms_opt(0, 0, 0)?;
            return Some(midnight.and_utc().to_rfc3339());
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== Timestamp Normalization Tests ====================

    #[test]
    fn test_to_iso_rfc3339_converted_to_utc() {
        let result = to_iso("2025-01-01T12:00:00+02:00").unwrap();
        assert_eq!(result, "2025-01-01T10:00:00+00:00");
    }

    #[test]
    fn test_to_iso_rfc2822() {
        let result = to_iso("Wed, 01 Jan 2025 12:00:00 GMT").unwrap();
        assert_eq!(result, "2025-01-01T12:00:00+00:00");
    }

    #[test]
    fn test_to_iso_date_only_becomes_midnight_utc() {
        let result = to_iso("2025-01-01").unwrap();
        assert_eq!(result, "2025-01-01T00:00:00+00:00");
    }

    #[test]
    fn test_to_iso_human_readable_date() {
        let result = to_iso("Jan 5, 2025").unwrap();
        assert_eq!(result, "2025-01-05T00:00:00+00:00");
    }

    #[test]
    fn test_to_iso_garbage_is_none() {
        assert!(to_iso("sometime last week").is_none());
    }

    // ==================== Description Flattening Tests ====================

    #[test]
    fn test_flatten_description_strips_html() {
        let result = flatten_description("<p>A <b>bold</b> announcement.</p>").unwrap();
        assert!(result.contains("bold announcement"));
        assert!(!result.contains('<'));
    }

    #[test]
    fn test_flatten_description_empty_is_none() {
        assert!(flatten_description("").is_none());
        assert!(flatten_description("   \n  ").is_none());
    }

    // ==================== Feed Mapping Tests ====================

    const RSS_FIXTURE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>Example News</title>
    <link>https://example.com/news</link>
    <description>News feed</description>
    <item>
      <title>First announcement</title>
      <link>https://example.com/news/first</link>
      <pubDate>Wed, 01 Jan 2025 12:00:00 GMT</pubDate>
      <description>&lt;p&gt;A description of the first announcement with some detail.&lt;/p&gt;</description>
    </item>
    <item>
      <title>Second announcement</title>
      <link>https://example.com/news/second</link>
      <pubDate>Thu, 02 Jan 2025 12:00:00 GMT</pubDate>
    </item>
  </channel>
</rss>"#;

    #[test]
    fn test_feed_items_maps_rss_entries() {
        let items = feed_items(RSS_FIXTURE.as_bytes(), "Example News").unwrap();
        assert_eq!(items.len(), 2);

        assert_eq!(items[0].title, "First announcement");
        assert_eq!(items[0].url, "https://example.com/news/first");
        assert_eq!(items[0].published_at, "2025-01-01T12:00:00+00:00");
        assert_eq!(items[0].source, "Example News");
        assert!(items[0]
            .description
            .as_deref()
            .unwrap()
            .contains("first announcement"));

        assert!(items[1].description.is_none());
    }

    #[test]
    fn test_feed_items_rejects_non_feed_body() {
        assert!(feed_items(b"<html><body>not a feed</body></html>", "X").is_err());
    }
}
