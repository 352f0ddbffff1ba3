use std::env;

const DEFAULT_MODEL: &str = "google/gemini-2.5-flash-preview-05-20";
const DEFAULT_MAX_STORIES: usize = 12;
const DEFAULT_CHAR_LIMIT: usize = 7000;
const DEFAULT_REFERER: &str = "https://example.com";

/// Settings for one digest run, read from the environment exactly once and
/// passed into the pipeline. Library code never touches process environment
/// after this point.
#[derive(Debug, Clone)]
pub struct DigestConfig {
    /// Absence is tolerated here so collection-only runs still work; the
    /// OpenRouter client refuses to build without it.
    pub openrouter_api_key: Option<String>,
    pub model: String,
    /// Max items per digest (`MAX_STORIES`).
    pub max_stories: usize,
    /// Max characters kept per extracted article (`ARTICLE_CHAR_LIMIT`).
    pub char_limit: usize,
    /// Attribution header sent to OpenRouter (`OPENROUTER_REFERER`).
    pub referer: String,
}

impl DigestConfig {
    pub fn from_env() -> Self {
        Self::try_load_dotenv();

        Self {
            openrouter_api_key: env::var("OPENROUTER_API_KEY")
                .ok()
                .filter(|key| !key.trim().is_empty()),
            model: env::var("OPENROUTER_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
            max_stories: env_usize("MAX_STORIES", DEFAULT_MAX_STORIES),
            char_limit: env_usize("ARTICLE_CHAR_LIMIT", DEFAULT_CHAR_LIMIT),
            referer: env::var("OPENROUTER_REFERER").unwrap_or_else(|_| DEFAULT_REFERER.to_string()),
        }
    }

    fn try_load_dotenv() {
        // Try locations in order of preference:

        // 1. Current directory (for development)
        if dotenvy::dotenv().is_ok() {
            return;
        }

        // 2. ~/.config/news-digest/.env (standard config location)
        if let Some(config_dir) = dirs::config_dir() {
            let config_path = config_dir.join("news-digest").join(".env");
            if config_path.exists() && dotenvy::from_path(&config_path).is_ok() {
                return;
            }
        }

        // 3. ~/.env (home directory)
        if let Some(home_dir) = dirs::home_dir() {
            let home_path = home_dir.join(".env");
            if home_path.exists() {
                let _ = dotenvy::from_path(&home_path);
            }
        }

        // If none found, that's okay - environment variables might be set system-wide
    }
}

impl Default for DigestConfig {
    fn default() -> Self {
        Self {
            openrouter_api_key: None,
            model: DEFAULT_MODEL.to_string(),
            max_stories: DEFAULT_MAX_STORIES,
            char_limit: DEFAULT_CHAR_LIMIT,
            referer: DEFAULT_REFERER.to_string(),
        }
    }
}

fn env_usize(name: &str, default: usize) -> usize {
    env::var(name)
        .ok()
        .and_then(|value| value.trim().parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = DigestConfig::default();
        assert!(config.openrouter_api_key.is_none());
        assert_eq!(config.max_stories, 12);
        assert_eq!(config.char_limit, 7000);
        assert_eq!(config.model, "google/gemini-2.5-flash-preview-05-20");
        assert_eq!(config.referer, "https://example.com");
    }

    #[test]
    fn test_env_usize_parses_and_falls_back() {
        env::set_var("NEWS_DIGEST_TEST_USIZE", "25");
        assert_eq!(env_usize("NEWS_DIGEST_TEST_USIZE", 12), 25);

        env::set_var("NEWS_DIGEST_TEST_USIZE", "not a number");
        assert_eq!(env_usize("NEWS_DIGEST_TEST_USIZE", 12), 12);

        env::remove_var("NEWS_DIGEST_TEST_USIZE");
        assert_eq!(env_usize("NEWS_DIGEST_TEST_USIZE", 12), 12);
    }
}
