use std::collections::HashMap;
use std::time::{Duration, Instant};

use reqwest::Client;
use serde::Deserialize;
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::article::{Article, Publisher};
use crate::config::Config;

const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Cache key: the exact query parameters of one request.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum QueryKey {
    Headlines { category: Option<String> },
    PublisherHeadlines { source_id: String },
    Search { query: String },
    FeedCandidates { term: String },
}

struct CachedArticles {
    fetched_at: Instant,
    articles: Vec<Article>,
}

#[derive(Deserialize)]
struct ArticlesResponse {
    status: String,
    #[serde(default)]
    articles: Vec<Article>,
}

#[derive(Deserialize)]
struct SourcesResponse {
    status: String,
    #[serde(default)]
    sources: Vec<Publisher>,
}

/// Adapter for the external news API.
///
/// Every query degrades to an empty result on transport failure, non-success
/// status, or an undecodable body; errors are logged and never propagate.
/// Successful responses are cached per exact query for the endpoint's TTL.
pub struct NewsClient {
    client: Client,
    base_url: String,
    api_key: String,
    country: String,
    language: String,
    headline_page_size: u32,
    search_page_size: u32,
    publisher_page_size: u32,
    feed_page_size: u32,
    headlines_ttl: Duration,
    search_ttl: Duration,
    publisher_ttl: Duration,
    feed_ttl: Duration,
    sources_ttl: Duration,
    cache: RwLock<HashMap<QueryKey, CachedArticles>>,
    sources_cache: RwLock<Option<(Instant, Vec<Publisher>)>>,
}

impl NewsClient {
    pub fn new(config: &Config, api_key: String) -> Self {
        let client = Client::builder()
            .timeout(HTTP_TIMEOUT)
            .user_agent("HeadlineHub/1.0 (News Reader)")
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: config.base_url.clone(),
            api_key,
            country: config.country.clone(),
            language: config.language.clone(),
            headline_page_size: config.headline_page_size,
            search_page_size: config.search_page_size,
            publisher_page_size: config.publisher_page_size,
            feed_page_size: config.feed_page_size,
            headlines_ttl: Duration::from_secs(config.headlines_ttl),
            search_ttl: Duration::from_secs(config.search_ttl),
            publisher_ttl: Duration::from_secs(config.publisher_ttl),
            feed_ttl: Duration::from_secs(config.feed_ttl),
            sources_ttl: Duration::from_secs(config.sources_ttl),
            cache: RwLock::new(HashMap::new()),
            sources_cache: RwLock::new(None),
        }
    }

    /// Top headlines for the configured country, optionally narrowed to a
    /// category. Pass `None` for the general view.
    pub async fn top_headlines(&self, category: Option<&str>) -> Vec<Article> {
        let mut params = vec![
            ("country".to_string(), self.country.clone()),
            ("pageSize".to_string(), self.headline_page_size.to_string()),
        ];
        if let Some(category) = category {
            params.push(("category".to_string(), category.to_string()));
        }

        let key = QueryKey::Headlines {
            category: category.map(|c| c.to_string()),
        };
        self.cached_articles(key, self.headlines_ttl, "/v2/top-headlines", params)
            .await
    }

    /// Latest headlines from a single publisher.
    pub async fn publisher_headlines(&self, source_id: &str) -> Vec<Article> {
        let params = vec![
            ("sources".to_string(), source_id.to_string()),
            ("pageSize".to_string(), self.publisher_page_size.to_string()),
        ];

        let key = QueryKey::PublisherHeadlines {
            source_id: source_id.to_string(),
        };
        self.cached_articles(key, self.publisher_ttl, "/v2/top-headlines", params)
            .await
    }

    /// Free-text search across all sources.
    pub async fn search(&self, query: &str) -> Vec<Article> {
        let params = vec![
            ("q".to_string(), query.to_string()),
            ("language".to_string(), self.language.clone()),
            ("pageSize".to_string(), self.search_page_size.to_string()),
        ];

        let key = QueryKey::Search {
            query: query.to_string(),
        };
        self.cached_articles(key, self.search_ttl, "/v2/everything", params)
            .await
    }

    /// Candidate articles for one interest term. Same endpoint as `search`
    /// but a smaller page and a longer TTL, cached under its own key.
    pub async fn feed_candidates(&self, term: &str) -> Vec<Article> {
        let params = vec![
            ("q".to_string(), term.to_string()),
            ("language".to_string(), self.language.clone()),
            ("pageSize".to_string(), self.feed_page_size.to_string()),
        ];

        let key = QueryKey::FeedCandidates {
            term: term.to_string(),
        };
        self.cached_articles(key, self.feed_ttl, "/v2/everything", params)
            .await
    }

    /// The full publisher directory.
    pub async fn sources(&self) -> Vec<Publisher> {
        {
            let cache = self.sources_cache.read().await;
            if let Some((fetched_at, sources)) = cache.as_ref() {
                if fetched_at.elapsed() < self.sources_ttl {
                    return sources.clone();
                }
            }
        }

        match self.fetch_sources().await {
            Ok(sources) => {
                let mut cache = self.sources_cache.write().await;
                *cache = Some((Instant::now(), sources.clone()));
                sources
            }
            Err(e) => {
                warn!("Sources fetch failed: {}", e);
                Vec::new()
            }
        }
    }

    async fn cached_articles(
        &self,
        key: QueryKey,
        ttl: Duration,
        path: &str,
        params: Vec<(String, String)>,
    ) -> Vec<Article> {
        {
            let cache = self.cache.read().await;
            if let Some(entry) = cache.get(&key) {
                if entry.fetched_at.elapsed() < ttl {
                    return entry.articles.clone();
                }
            }
        }

        match self.fetch_articles(path, params).await {
            Ok(articles) => {
                info!("Fetched {} articles from {}", articles.len(), path);
                let mut cache = self.cache.write().await;
                cache.insert(
                    key,
                    CachedArticles {
                        fetched_at: Instant::now(),
                        articles: articles.clone(),
                    },
                );
                articles
            }
            Err(e) => {
                // Failures are not cached, so the next call may recover.
                warn!("Query {} failed: {}", path, e);
                Vec::new()
            }
        }
    }

    async fn fetch_articles(
        &self,
        path: &str,
        mut params: Vec<(String, String)>,
    ) -> anyhow::Result<Vec<Article>> {
        params.push(("apiKey".to_string(), self.api_key.clone()));

        let url = format!("{}{}", self.base_url, path);
        let response: ArticlesResponse =
            self.client.get(&url).query(&params).send().await?.json().await?;

        if response.status != "ok" {
            anyhow::bail!("API returned status '{}'", response.status);
        }
        Ok(response.articles)
    }

    async fn fetch_sources(&self) -> anyhow::Result<Vec<Publisher>> {
        let url = format!("{}/v2/sources", self.base_url);
        let response: SourcesResponse = self
            .client
            .get(&url)
            .query(&[("apiKey", self.api_key.as_str())])
            .send()
            .await?
            .json()
            .await?;

        if response.status != "ok" {
            anyhow::bail!("API returned status '{}'", response.status);
        }
        Ok(response.sources)
    }
}
