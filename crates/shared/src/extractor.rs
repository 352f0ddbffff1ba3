use anyhow::{Context, Result};
use readability::extractor;
use reqwest::{Client, StatusCode};
use std::io::Cursor;
use std::time::Duration;
use tracing::{info, warn};
use url::Url;

const PROXY_ENDPOINT: &str = "https://r.jina.ai/";
const FETCH_TIMEOUT_SECS: u64 = 20;
const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64)";

/// Best-effort article text retrieval. `extract` never fails: any error path
/// degrades to an empty string so one unreachable article cannot abort a
/// digest run.
pub struct ContentExtractor {
    client: Client,
    char_limit: usize,
}

enum Fetched {
    Body(String),
    AccessDenied,
}

impl ContentExtractor {
    pub fn new(char_limit: usize) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(FETCH_TIMEOUT_SECS))
            .user_agent(BROWSER_USER_AGENT)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client, char_limit })
    }

    /// Returns main article text, or an empty string when nothing could be
    /// retrieved. A 403 on the direct fetch is retried once through the
    /// readability proxy before giving up.
    pub async fn extract(&self, url: &str) -> String {
        match self.direct_readable(url).await {
            Ok(Fetched::Body(text)) => text,
            Ok(Fetched::AccessDenied) => {
                info!("403 - trying readability proxy for {}", url);
                match self.proxy_readable(url).await {
                    Ok(text) => text,
                    Err(e) => {
                        warn!("proxy extraction failed {}: {:#}", url, e);
                        String::new()
                    }
                }
            }
            Err(e) => {
                warn!("extract_text failed {}: {:#}", url, e);
                String::new()
            }
        }
    }

    async fn direct_readable(&self, url: &str) -> Result<Fetched> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .context("Failed to send HTTP request")?;

        if response.status() == StatusCode::FORBIDDEN {
            return Ok(Fetched::AccessDenied);
        }

        let response = response.error_for_status().context("HTTP error status")?;
        let html = response.text().await.context("Failed to read response body")?;

        let text = readable_text(&html, url)?;
        Ok(Fetched::Body(truncate_chars(&text, self.char_limit)))
    }

    async fn proxy_readable(&self, url: &str) -> Result<String> {
        let proxy_url = format!("{}{}", PROXY_ENDPOINT, url);
        let response = self
            .client
            .get(&proxy_url)
            .send()
            .await
            .context("Failed to reach readability proxy")?
            .error_for_status()
            .context("Readability proxy error status")?;

        let text = response.text().await.context("Failed to read proxy body")?;
        let text = text.trim();
        if text.is_empty() {
            return Ok(String::new());
        }
        Ok(truncate_chars(text, self.char_limit))
    }
}

/// Run readability over raw HTML to strip navigation and boilerplate, and
/// flatten the main content to plain text.
fn readable_text(html: &str, url: &str) -> Result<String> {
    let base = Url::parse(url).context("Invalid article URL")?;
    let mut reader = Cursor::new(html.as_bytes());
    let product = extractor::extract(&mut reader, &base)
        .map_err(|e| anyhow::anyhow!("readability extraction failed: {:?}", e))?;
    Ok(product.text)
}

/// Character-based truncation that never splits a UTF-8 code point.
pub(crate) fn truncate_chars(text: &str, limit: usize) -> String {
    if text.chars().count() <= limit {
        return text.to_string();
    }
    text.chars().take(limit).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_chars_short_text_unchanged() {
        assert_eq!(truncate_chars("hello", 10), "hello");
    }

    #[test]
    fn test_truncate_chars_cuts_at_limit() {
        assert_eq!(truncate_chars("hello world", 5), "hello");
    }

    #[test]
    fn test_truncate_chars_multibyte_safe() {
        // Each 'é' is two bytes; counting must be by character.
        let text = "ééééé";
        assert_eq!(truncate_chars(text, 3), "ééé");
    }

    #[test]
    fn test_readable_text_strips_boilerplate() {
        let html = r#"<!DOCTYPE html>
            <html><head><title>Test Story</title></head>
            <body>
              <nav><ul><li><a href="/">Home</a></li><li><a href="/about">About</a></li></ul></nav>
              <article>
                <h1>Test Story</h1>
                <p>The quick brown fox jumps over the lazy dog. This paragraph is part
                of the main article body and carries the actual content readers care
                about, repeated to give the extractor something substantial.</p>
                <p>A second paragraph keeps the article long enough that the content
                scorer prefers it over the navigation links at the top of the page.</p>
              </article>
            </body></html>"#;

        let text = readable_text(html, "https://example.com/story").unwrap();
        assert!(text.contains("quick brown fox"));
        assert!(text.contains("second paragraph"));
    }

    #[test]
    fn test_readable_text_rejects_invalid_url() {
        assert!(readable_text("<html></html>", "not a url").is_err());
    }
}
