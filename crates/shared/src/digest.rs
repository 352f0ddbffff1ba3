use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use std::future::Future;
use tracing::info;

use crate::config::DigestConfig;
use crate::error::DigestError;
use crate::extractor::{truncate_chars, ContentExtractor};
use crate::models::{Digest, EnrichedItem, NewsItem};
use crate::openrouter::OpenRouterClient;
use crate::prompt;

/// Descriptions at or below this stripped length are considered too thin to
/// stand in for the article body.
const MIN_DESCRIPTION_CHARS: usize = 50;

/// How many trailing characters of a malformed response to keep for
/// diagnostics.
const RESPONSE_TAIL_CHARS: usize = 200;

/// End-to-end digest pipeline: select the most recent items, enrich them with
/// article text, build one prompt, make one model call, validate the reply.
pub struct DigestGenerator {
    config: DigestConfig,
    extractor: ContentExtractor,
    llm: OpenRouterClient,
}

impl DigestGenerator {
    pub fn new(config: DigestConfig) -> Result<Self> {
        let llm = OpenRouterClient::new(&config)?;
        let extractor = ContentExtractor::new(config.char_limit)?;

        Ok(Self {
            config,
            extractor,
            llm,
        })
    }

    pub async fn create_digest(
        &self,
        items: Vec<NewsItem>,
        date: NaiveDate,
    ) -> std::result::Result<Digest, DigestError> {
        let selected = select_recent(items, self.config.max_stories);
        info!("Generating digest for {} stories", selected.len());

        let enriched = enrich_items(selected, self.config.char_limit, |url| async move {
            self.extractor.extract(&url).await
        })
        .await;

        let prompt_text = prompt::build_prompt(&enriched, &date.to_string());
        let raw = self.llm.request_digest(&prompt_text).await?;
        parse_digest(&raw)
    }
}

/// Most-recent-first selection, bounded to `max` items. The sort is stable:
/// ties keep their original relative order, and items whose timestamp cannot
/// be parsed sink to the end.
pub fn select_recent(mut items: Vec<NewsItem>, max: usize) -> Vec<NewsItem> {
    items.sort_by(|a, b| parse_when(&b.published_at).cmp(&parse_when(&a.published_at)));
    items.truncate(max);
    items
}

fn parse_when(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value.trim())
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
}

/// Attach `content` to every item, in input order, one at a time. Items whose
/// description strips to more than 50 characters reuse it instead of fetching;
/// everything else goes through `fetch` (the content extractor in production,
/// a closure in tests).
pub async fn enrich_items<F, Fut>(
    items: Vec<NewsItem>,
    char_limit: usize,
    fetch: F,
) -> Vec<EnrichedItem>
where
    F: Fn(String) -> Fut,
    Fut: Future<Output = String>,
{
    let mut enriched = Vec::with_capacity(items.len());
    for item in items {
        let content = match usable_description(&item, char_limit) {
            Some(text) => {
                info!("Using collector description for {}", item.url);
                text
            }
            None => fetch(item.url.clone()).await,
        };
        enriched.push(EnrichedItem { item, content });
    }
    enriched
}

fn usable_description(item: &NewsItem, char_limit: usize) -> Option<String> {
    let description = item.description.as_deref()?;
    if description.trim().chars().count() > MIN_DESCRIPTION_CHARS {
        Some(truncate_chars(description, char_limit))
    } else {
        None
    }
}

/// Parse and shape-check the model's raw JSON text. Ids and urls are taken at
/// face value; only structure is validated.
pub fn parse_digest(raw: &str) -> std::result::Result<Digest, DigestError> {
    let value: serde_json::Value = serde_json::from_str(raw).map_err(|_| {
        // Responses that hit the token budget are cut mid-string and stop
        // parsing; keep the tail so the log shows where.
        DigestError::MalformedResponse {
            length: raw.chars().count(),
            tail: tail_chars(raw, RESPONSE_TAIL_CHARS),
            likely_truncated: !raw.trim_end().ends_with('}'),
        }
    })?;

    serde_json::from_value(value).map_err(|e| DigestError::SchemaViolation(e.to_string()))
}

fn tail_chars(text: &str, limit: usize) -> String {
    let count = text.chars().count();
    text.chars().skip(count.saturating_sub(limit)).collect()
}
