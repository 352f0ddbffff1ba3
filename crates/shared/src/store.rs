use anyhow::{Context, Result};
use rusqlite::{params, Connection};
use std::path::Path;
use tracing::debug;

use crate::models::NewsItem;

/// Append-only SQLite store for collected news items. Inserts are
/// deduplicated by URL, so re-collecting the same story is a no-op.
pub struct NewsStore {
    conn: Connection,
}

impl NewsStore {
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database at {}", path.display()))?;
        Self::init(conn)
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn =
            Connection::open_in_memory().context("Failed to open in-memory database")?;
        Self::init(conn)
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS news_items (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                url TEXT UNIQUE NOT NULL,
                published_at TEXT NOT NULL,
                source TEXT NOT NULL,
                description TEXT,
                created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
            )",
            [],
        )
        .context("Failed to create news_items table")?;

        Ok(Self { conn })
    }

    /// Insert a batch, ignoring items whose URL is already stored. Returns
    /// how many were actually new.
    pub fn save_batch(&self, items: &[NewsItem]) -> Result<usize> {
        if items.is_empty() {
            return Ok(0);
        }

        let mut inserted = 0;
        for item in items {
            let changed = self
                .conn
                .execute(
                    "INSERT OR IGNORE INTO news_items
                     (title, url, published_at, source, description)
                     VALUES (?1, ?2, ?3, ?4, ?5)",
                    params![
                        item.title,
                        item.url,
                        item.published_at,
                        item.source,
                        item.description
                    ],
                )
                .with_context(|| format!("Failed to save item {}", item.url))?;
            inserted += changed;
        }

        debug!("Saved {} new items ({} offered)", inserted, items.len());
        Ok(inserted)
    }

    /// Most recently published items, newest first.
    pub fn recent_items(&self, limit: usize) -> Result<Vec<NewsItem>> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT title, url, published_at, source, description
                 FROM news_items
                 ORDER BY published_at DESC
                 LIMIT ?1",
            )
            .context("Failed to prepare recent items query")?;

        let rows = stmt
            .query_map(params![limit as i64], |row| {
                Ok(NewsItem {
                    title: row.get(0)?,
                    url: row.get(1)?,
                    published_at: row.get(2)?,
                    source: row.get(3)?,
                    description: row.get(4)?,
                })
            })
            .context("Failed to query recent items")?;

        let mut items = Vec::new();
        for row in rows {
            items.push(row.context("Failed to read news item row")?);
        }
        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(url: &str, published_at: &str) -> NewsItem {
        NewsItem {
            title: format!("Story at {}", url),
            url: url.to_string(),
            published_at: published_at.to_string(),
            source: "Test Source".to_string(),
            description: None,
        }
    }

    #[test]
    fn test_save_batch_empty_is_noop() {
        let store = NewsStore::open_in_memory().unwrap();
        assert_eq!(store.save_batch(&[]).unwrap(), 0);
    }

    #[test]
    fn test_save_batch_dedups_by_url() {
        let store = NewsStore::open_in_memory().unwrap();
        let items = vec![
            item("https://example.com/a", "2025-01-01T00:00:00Z"),
            item("https://example.com/b", "2025-01-02T00:00:00Z"),
        ];

        assert_eq!(store.save_batch(&items).unwrap(), 2);
        // Same URLs again: nothing new.
        assert_eq!(store.save_batch(&items).unwrap(), 0);
        assert_eq!(store.recent_items(10).unwrap().len(), 2);
    }

    #[test]
    fn test_recent_items_ordered_and_limited() {
        let store = NewsStore::open_in_memory().unwrap();
        let items = vec![
            item("https://example.com/old", "2025-01-01T00:00:00Z"),
            item("https://example.com/new", "2025-01-03T00:00:00Z"),
            item("https://example.com/mid", "2025-01-02T00:00:00Z"),
        ];
        store.save_batch(&items).unwrap();

        let recent = store.recent_items(2).unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].url, "https://example.com/new");
        assert_eq!(recent[1].url, "https://example.com/mid");
    }

    #[test]
    fn test_description_survives_a_round_trip() {
        let store = NewsStore::open_in_memory().unwrap();
        let mut stored = item("https://example.com/a", "2025-01-01T00:00:00Z");
        stored.description = Some("A description long enough to matter.".to_string());
        store.save_batch(std::slice::from_ref(&stored)).unwrap();

        let recent = store.recent_items(1).unwrap();
        assert_eq!(recent[0], stored);
    }

    #[test]
    fn test_recent_items_empty_store() {
        let store = NewsStore::open_in_memory().unwrap();
        assert!(store.recent_items(10).unwrap().is_empty());
    }
}
