use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A news article as returned by the NewsAPI endpoints.
///
/// Identity is the `url` field: two articles with the same url are the same
/// article for all dedup and lookup purposes, regardless of other fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Article {
    #[serde(default)]
    pub source: ArticleSource,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub url: String,
    #[serde(rename = "urlToImage", default)]
    pub url_to_image: Option<String>,
    #[serde(rename = "publishedAt", default)]
    pub published_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ArticleSource {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

/// A publisher entry from the sources endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Publisher {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
}

/// Human-readable "time since published" label.
///
/// Returns an empty string when the article carries no timestamp. `now` is
/// passed in so callers and tests agree on the clock.
pub fn time_ago(published_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> String {
    let Some(published) = published_at else {
        return String::new();
    };

    let seconds = (now - published).num_seconds().max(0);

    if seconds < 60 {
        "Just now".to_string()
    } else if seconds < 3600 {
        format!("{} minutes ago", seconds / 60)
    } else if seconds < 86400 {
        format!("{} hours ago", seconds / 3600)
    } else {
        let days = seconds / 86400;
        format!("{} day{} ago", days, if days > 1 { "s" } else { "" })
    }
}
