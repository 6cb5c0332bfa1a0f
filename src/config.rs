use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{AppError, Result};

/// Used when the user has not configured a key of their own.
pub const DEFAULT_API_KEY: &str = "YOUR_API_KEY_HERE";
pub const DEFAULT_BASE_URL: &str = "https://newsapi.org/v2";

const MAX_HEADLINE_COUNT: usize = 20;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_db_path")]
    pub db_path: String,

    /// User override for the NewsAPI key.
    pub api_key: Option<String>,

    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_country")]
    pub default_country: String,

    #[serde(default = "default_category")]
    pub default_category: String,

    #[serde(default = "default_headline_count")]
    pub headline_count: usize,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_db_path() -> String {
    let data_dir = dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("unbiased-news");
    std::fs::create_dir_all(&data_dir).ok();
    data_dir.join("news.db").to_string_lossy().to_string()
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_country() -> String {
    "us".to_string()
}

fn default_category() -> String {
    "general".to_string()
}

fn default_headline_count() -> usize {
    5
}

fn default_request_timeout() -> u64 {
    30
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            api_key: None,
            base_url: default_base_url(),
            default_country: default_country(),
            default_category: default_category(),
            headline_count: default_headline_count(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Reads the config at `path`, writing the defaults there first if the
    /// file does not exist yet.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            let config = Config::default();
            config.save_to(path)?;
            Ok(config)
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| AppError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("unbiased-news")
            .join("config.toml")
    }

    /// The user's key when one is set, otherwise the built-in default.
    pub fn resolved_api_key(&self) -> &str {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .unwrap_or(DEFAULT_API_KEY)
    }

    pub fn uses_default_api_key(&self) -> bool {
        self.resolved_api_key() == DEFAULT_API_KEY
    }

    pub fn headline_count(&self) -> usize {
        self.headline_count.clamp(1, MAX_HEADLINE_COUNT)
    }
}
