use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::models::Digest;

/// Write the digest as pretty-printed JSON to `<out_dir>/<date>.json`,
/// creating the directory if needed.
pub fn save_digest(digest: &Digest, out_dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(out_dir).with_context(|| {
        format!("Failed to create output directory {}", out_dir.display())
    })?;

    let filepath = out_dir.join(format!("{}.json", digest.date));
    let json = serde_json::to_string_pretty(digest).context("Failed to serialize digest")?;
    fs::write(&filepath, json)
        .with_context(|| format!("Failed to write digest file {}", filepath.display()))?;

    Ok(filepath)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Story;

    #[test]
    fn test_save_digest_names_file_by_date() {
        let digest = Digest {
            date: "2025-01-01".to_string(),
            executive_summary: "Quiet day.".to_string(),
            stories: vec![Story {
                id: "abc123def4567890".to_string(),
                title: "Title".to_string(),
                url: "https://example.com".to_string(),
                published_at: "2025-01-01T12:00:00Z".to_string(),
                source: "Source".to_string(),
                category: None,
                summary: "A summary.".to_string(),
                tags: Vec::new(),
            }],
        };

        let out_dir = std::env::temp_dir().join("news-digest-io-test");
        let path = save_digest(&digest, &out_dir).unwrap();
        assert_eq!(path.file_name().unwrap(), "2025-01-01.json");

        let written = fs::read_to_string(&path).unwrap();
        let reparsed: Digest = serde_json::from_str(&written).unwrap();
        assert_eq!(reparsed, digest);

        let _ = fs::remove_dir_all(&out_dir);
    }
}
