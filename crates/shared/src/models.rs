use serde::{Deserialize, Serialize};

/// A collected news item. `url` is the unique key everywhere: the store
/// dedups on it and the digest derives story ids from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsItem {
    pub title: String,
    pub url: String,
    /// ISO-8601 publication timestamp as reported by the collector.
    pub published_at: String,
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A news item with article text attached, ready for prompt construction.
/// Built once per digest run and never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedItem {
    pub item: NewsItem,
    /// Collector description or extracted article body; empty when both
    /// were unavailable.
    pub content: String,
}

/// The structured daily digest as returned by the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Digest {
    pub date: String,
    pub executive_summary: String,
    pub stories: Vec<Story>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Story {
    pub id: String,
    pub title: String,
    pub url: String,
    pub published_at: String,
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub summary: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}
