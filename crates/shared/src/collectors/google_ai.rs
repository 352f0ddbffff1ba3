use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::info;

use super::{feed_items, Collector};
use crate::models::NewsItem;

const SOURCE_NAME: &str = "Google AI";
const FEED_URL: &str = "https://blog.google/technology/ai/rss/";
const FETCH_TIMEOUT_SECS: u64 = 20;

/// Collector for the Google AI blog RSS feed.
pub struct GoogleAiCollector {
    client: Client,
}

impl GoogleAiCollector {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(FETCH_TIMEOUT_SECS))
            .user_agent("Mozilla/5.0")
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Collector for GoogleAiCollector {
    fn source_name(&self) -> &str {
        SOURCE_NAME
    }

    async fn fetch_items(&self) -> Result<Vec<NewsItem>> {
        let response = self
            .client
            .get(FEED_URL)
            .send()
            .await
            .context("Failed to fetch Google AI feed")?
            .error_for_status()
            .context("Google AI feed returned error status")?;

        let body = response.bytes().await.context("Failed to read feed body")?;
        let items = feed_items(&body, SOURCE_NAME)?;
        info!("Google AI RSS ok ({} items)", items.len());
        Ok(items)
    }
}
