use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// NewsAPI key; the NEWS_API_KEY environment variable takes precedence.
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_country")]
    pub country: String,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default = "default_bookmark_file")]
    pub bookmark_file: String,
    #[serde(default = "default_categories")]
    pub categories: Vec<String>,
    /// Publishers mixed into the "general" headline view, 3 articles each.
    #[serde(default = "default_favorite_sources")]
    pub favorite_sources: Vec<String>,
    #[serde(default = "default_headline_page_size")]
    pub headline_page_size: u32,
    #[serde(default = "default_search_page_size")]
    pub search_page_size: u32,
    #[serde(default = "default_publisher_page_size")]
    pub publisher_page_size: u32,
    #[serde(default = "default_feed_page_size")]
    pub feed_page_size: u32,
    /// Cache TTLs in seconds, one per endpoint.
    #[serde(default = "default_headlines_ttl")]
    pub headlines_ttl: u64,
    #[serde(default = "default_search_ttl")]
    pub search_ttl: u64,
    #[serde(default = "default_publisher_ttl")]
    pub publisher_ttl: u64,
    #[serde(default = "default_feed_ttl")]
    pub feed_ttl: u64,
    #[serde(default = "default_sources_ttl")]
    pub sources_ttl: u64,
}

fn default_base_url() -> String {
    "https://newsapi.org".to_string()
}

fn default_country() -> String {
    "us".to_string()
}

fn default_language() -> String {
    "en".to_string()
}

fn default_bookmark_file() -> String {
    "bookmarks.json".to_string()
}

fn default_categories() -> Vec<String> {
    [
        "general",
        "technology",
        "business",
        "sports",
        "health",
        "entertainment",
        "science",
    ]
    .iter()
    .map(|c| c.to_string())
    .collect()
}

fn default_favorite_sources() -> Vec<String> {
    ["bbc-news", "cnn", "nbc-news", "fox-news", "abc-news"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_headline_page_size() -> u32 {
    10
}

fn default_search_page_size() -> u32 {
    20
}

fn default_publisher_page_size() -> u32 {
    15
}

fn default_feed_page_size() -> u32 {
    10
}

fn default_headlines_ttl() -> u64 {
    3600
}

fn default_search_ttl() -> u64 {
    900
}

fn default_publisher_ttl() -> u64 {
    1800
}

fn default_feed_ttl() -> u64 {
    1800
}

fn default_sources_ttl() -> u64 {
    86400
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Parse config from a TOML string (useful for testing)
    pub fn from_str(content: &str) -> anyhow::Result<Self> {
        let config: Config = toml::from_str(content)?;
        Ok(config)
    }

    /// Resolved API key: environment first, then the config file.
    pub fn resolve_api_key(&self) -> anyhow::Result<String> {
        std::env::var("NEWS_API_KEY")
            .ok()
            .or_else(|| self.api_key.clone())
            .ok_or_else(|| anyhow::anyhow!("no API key: set NEWS_API_KEY or api_key in config"))
    }
}
