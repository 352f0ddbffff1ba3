use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use scraper::{Html, Selector};
use std::time::Duration;
use tracing::{info, warn};
use url::Url;

use super::{feed_items, to_iso, Collector};
use crate::models::NewsItem;

const SOURCE_NAME: &str = "OpenAI News";
const PAGE_URL: &str = "https://openai.com/news";
const RSS_CANDIDATES: [&str; 2] = [
    "https://openai.com/news/rss.xml",
    "https://openrss.org/openai.com/news",
];
const FETCH_TIMEOUT_SECS: u64 = 20;

/// Collector for openai.com/news. Strategies are tried in order until one
/// returns items: the official RSS feed, a community mirror, then scraping
/// the news landing page.
pub struct OpenAiNewsCollector {
    client: Client,
}

impl OpenAiNewsCollector {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(FETCH_TIMEOUT_SECS))
            .user_agent("Mozilla/5.0")
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client })
    }

    async fn try_rss(&self, url: &str) -> Result<Vec<NewsItem>> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .context("Failed to fetch feed")?
            .error_for_status()
            .context("Feed returned error status")?;

        let body = response.bytes().await.context("Failed to read feed body")?;
        feed_items(&body, SOURCE_NAME)
    }

    async fn scrape_page(&self) -> Result<Vec<NewsItem>> {
        let response = self
            .client
            .get(PAGE_URL)
            .send()
            .await
            .context("Failed to fetch news page")?
            .error_for_status()
            .context("News page returned error status")?;

        let html = response.text().await.context("Failed to read news page")?;
        let items = parse_news_page(&html, PAGE_URL)?;
        info!("Scraped OpenAI page ({} items)", items.len());
        Ok(items)
    }
}

#[async_trait]
impl Collector for OpenAiNewsCollector {
    fn source_name(&self) -> &str {
        SOURCE_NAME
    }

    async fn fetch_items(&self) -> Result<Vec<NewsItem>> {
        for rss_url in RSS_CANDIDATES {
            match self.try_rss(rss_url).await {
                Ok(items) if !items.is_empty() => {
                    info!("OpenAI RSS ok via {} ({} items)", rss_url, items.len());
                    return Ok(items);
                }
                Ok(_) => {}
                Err(e) => warn!("RSS failed {}: {:#}", rss_url, e),
            }
        }

        self.scrape_page().await
    }
}

/// Pull story cards out of the landing page. Anchors without a `<time>` child
/// are navigation or duplicate links and are skipped.
fn parse_news_page(html: &str, page_url: &str) -> Result<Vec<NewsItem>> {
    let document = Html::parse_document(html);
    let card_selector =
        Selector::parse("main a[href^='/']").map_err(|e| anyhow!("bad selector: {}", e))?;
    let time_selector = Selector::parse("time").map_err(|e| anyhow!("bad selector: {}", e))?;
    let base = Url::parse(page_url).context("Invalid page URL")?;

    let mut items = Vec::new();
    for card in document.select(&card_selector) {
        let Some(time_el) = card.select(&time_selector).next() else {
            continue;
        };
        let Some(href) = card.value().attr("href") else {
            continue;
        };
        let Ok(link) = base.join(href) else {
            continue;
        };

        let title = card.text().collect::<Vec<_>>().join(" ");
        let title = title.split_whitespace().collect::<Vec<_>>().join(" ");

        let raw_ts = time_el
            .value()
            .attr("datetime")
            .map(str::to_string)
            .unwrap_or_else(|| time_el.text().collect::<String>());
        let Some(published_at) = to_iso(&raw_ts) else {
            continue;
        };

        items.push(NewsItem {
            title,
            url: link.to_string(),
            published_at,
            source: SOURCE_NAME.to_string(),
            description: None,
        });
    }
    Ok(items)
}
