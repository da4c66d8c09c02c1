use std::collections::HashSet;
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, RwLock};

use crate::article::{time_ago, Article, Publisher};
use crate::config::Config;
use crate::feed;
use crate::newsapi::NewsClient;
use crate::profile::InterestProfile;
use crate::store::BookmarkStore;

/// Headlines taken from each favorite source on the general view.
const GENERAL_PER_SOURCE: usize = 3;
/// Shortest free-text query worth searching (and tracking).
const MIN_QUERY_CHARS: usize = 3;

pub struct AppState {
    pub config: Config,
    pub news: NewsClient,
    pub store: Mutex<BookmarkStore>,
    pub profile: RwLock<InterestProfile>,
}

// Response payloads

#[derive(Debug, Serialize)]
pub struct ArticleView {
    pub title: String,
    pub description: Option<String>,
    pub url: String,
    pub image: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub time_ago: String,
    pub source_id: Option<String>,
    pub source_name: Option<String>,
    pub bookmarked: bool,
}

impl ArticleView {
    fn new(article: &Article, bookmarked: bool, now: DateTime<Utc>) -> Self {
        Self {
            title: article.title.clone(),
            description: article.description.clone(),
            url: article.url.clone(),
            image: article.url_to_image.clone(),
            published_at: article.published_at,
            time_ago: time_ago(article.published_at, now),
            source_id: article.source.id.clone(),
            source_name: article.source.name.clone(),
            bookmarked,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HeadlinesResponse {
    pub category: String,
    pub articles: Vec<ArticleView>,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub articles: Vec<ArticleView>,
}

#[derive(Debug, Serialize)]
pub struct PublisherView {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub country: Option<String>,
    pub country_name: Option<String>,
}

impl From<Publisher> for PublisherView {
    fn from(publisher: Publisher) -> Self {
        let country_name = publisher.country.as_deref().map(country_name);
        Self {
            id: publisher.id,
            name: publisher.name,
            description: publisher.description,
            category: publisher.category,
            country: publisher.country,
            country_name,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ForYouArticle {
    #[serde(flatten)]
    pub article: ArticleView,
    pub reason: String,
}

#[derive(Debug, Serialize)]
pub struct ForYouResponse {
    pub articles: Vec<ForYouArticle>,
    /// Informational empty-state message, set only when no interest signal
    /// exists yet.
    pub notice: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SaveResponse {
    pub saved: bool,
    pub total: usize,
}

#[derive(Debug, Serialize)]
pub struct RemoveResponse {
    pub removed: bool,
    pub total: usize,
}

// Custom error type
pub struct AppError(anyhow::Error);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Error: {}", self.0),
        )
            .into_response()
    }
}

impl<E: Into<anyhow::Error>> From<E> for AppError {
    fn from(err: E) -> Self {
        AppError(err.into())
    }
}

fn bad_request(message: &str) -> Response {
    (StatusCode::BAD_REQUEST, message.to_string()).into_response()
}

// Route handlers

pub async fn health() -> impl IntoResponse {
    "OK"
}

#[derive(Deserialize)]
pub struct HeadlinesQuery {
    #[serde(default)]
    pub category: Option<String>,
}

pub async fn headlines(
    State(state): State<Arc<AppState>>,
    Query(query): Query<HeadlinesQuery>,
) -> Result<Response, AppError> {
    let category = query.category.as_deref();

    if let Some(cat) = category {
        if !state.config.categories.iter().any(|c| c == cat) {
            return Ok(bad_request("unknown category"));
        }
        state.profile.write().await.track_category(cat);
    }

    let label = category.unwrap_or("general");
    let articles = if label == "general" {
        // The general view mixes a few headlines from each favorite source.
        let batches = join_all(
            state
                .config
                .favorite_sources
                .iter()
                .map(|source| state.news.publisher_headlines(source)),
        )
        .await;
        batches
            .into_iter()
            .flat_map(|batch| batch.into_iter().take(GENERAL_PER_SOURCE))
            .collect()
    } else {
        state.news.top_headlines(Some(label)).await
    };

    track_result_publishers(&state, &articles).await;

    Ok(Json(HeadlinesResponse {
        category: label.to_string(),
        articles: article_views(&state, &articles).await,
    })
    .into_response())
}

#[derive(Deserialize)]
pub struct SearchQuery {
    pub q: String,
}

pub async fn search(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SearchQuery>,
) -> Result<Response, AppError> {
    let q = query.q.trim();
    if q.chars().count() < MIN_QUERY_CHARS {
        return Ok(bad_request("query must be at least 3 characters"));
    }

    state.profile.write().await.track_search(q);

    let articles = state.news.search(q).await;
    track_result_publishers(&state, &articles).await;

    Ok(Json(SearchResponse {
        query: q.to_string(),
        articles: article_views(&state, &articles).await,
    })
    .into_response())
}

#[derive(Deserialize)]
pub struct PublishersQuery {
    #[serde(default)]
    pub country: Option<String>,
}

pub async fn publishers(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PublishersQuery>,
) -> Result<impl IntoResponse, AppError> {
    let sources = state.news.sources().await;

    let publishers: Vec<PublisherView> = sources
        .into_iter()
        .filter(|s| match &query.country {
            Some(country) => s.country.as_deref() == Some(country.as_str()),
            None => true,
        })
        .map(PublisherView::from)
        .collect();

    Ok(Json(publishers))
}

pub async fn publisher_headlines(
    State(state): State<Arc<AppState>>,
    Path(source_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state.profile.write().await.track_publisher(&source_id);

    let articles = state.news.publisher_headlines(&source_id).await;

    Ok(Json(HeadlinesResponse {
        category: source_id,
        articles: article_views(&state, &articles).await,
    }))
}

pub async fn list_bookmarks(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let now = Utc::now();
    let store = state.store.lock().await;
    let views: Vec<ArticleView> = store
        .articles()
        .iter()
        .map(|a| ArticleView::new(a, true, now))
        .collect();
    Ok(Json(views))
}

pub async fn save_bookmark(
    State(state): State<Arc<AppState>>,
    Json(article): Json<Article>,
) -> Result<impl IntoResponse, AppError> {
    let mut store = state.store.lock().await;
    let saved = store.add(article)?;
    if saved {
        state.profile.write().await.record_save();
    }

    Ok(Json(SaveResponse {
        saved,
        total: store.len(),
    }))
}

#[derive(Deserialize)]
pub struct RemoveQuery {
    pub url: String,
}

pub async fn remove_bookmark(
    State(state): State<Arc<AppState>>,
    Query(query): Query<RemoveQuery>,
) -> Result<impl IntoResponse, AppError> {
    let mut store = state.store.lock().await;
    let removed = store.remove(&query.url)?;
    if removed {
        state.profile.write().await.record_unsave();
    }

    Ok(Json(RemoveResponse {
        removed,
        total: store.len(),
    }))
}

pub async fn for_you(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, AppError> {
    // Snapshot both signal sources so the fan-out below runs without locks.
    let bookmarks: Vec<Article> = state.store.lock().await.articles().to_vec();
    let profile = state.profile.read().await.clone();

    let terms = match feed::interest_terms(&bookmarks, &profile) {
        Ok(terms) => terms,
        Err(signal) => {
            return Ok(Json(ForYouResponse {
                articles: Vec::new(),
                notice: Some(signal.to_string()),
            }))
        }
    };

    // Each term query is independent and read-only, so fetch them together.
    let batches = join_all(terms.iter().map(|term| state.news.feed_candidates(term))).await;
    let candidates = feed::merge_candidates(batches);

    let now = Utc::now();
    let bookmarked: HashSet<&str> = bookmarks.iter().map(|a| a.url.as_str()).collect();
    let articles = candidates
        .iter()
        .map(|article| ForYouArticle {
            article: ArticleView::new(article, bookmarked.contains(article.url.as_str()), now),
            reason: feed::reason_for(article, &profile),
        })
        .collect();

    Ok(Json(ForYouResponse {
        articles,
        notice: None,
    }))
}

async fn track_result_publishers(state: &AppState, articles: &[Article]) {
    let mut profile = state.profile.write().await;
    for article in articles {
        if let Some(id) = article.source.id.as_deref() {
            profile.track_publisher(id);
        }
    }
}

async fn article_views(state: &AppState, articles: &[Article]) -> Vec<ArticleView> {
    let now = Utc::now();
    let store = state.store.lock().await;
    articles
        .iter()
        .map(|a| ArticleView::new(a, store.contains(&a.url), now))
        .collect()
}

/// Display name for a NewsAPI country code.
fn country_name(code: &str) -> String {
    match code {
        "ae" => "United Arab Emirates",
        "ar" => "Argentina",
        "at" => "Austria",
        "au" => "Australia",
        "be" => "Belgium",
        "bg" => "Bulgaria",
        "br" => "Brazil",
        "ca" => "Canada",
        "ch" => "Switzerland",
        "cn" => "China",
        "co" => "Colombia",
        "cu" => "Cuba",
        "cz" => "Czech Republic",
        "de" => "Germany",
        "eg" => "Egypt",
        "fr" => "France",
        "gb" => "United Kingdom",
        "gr" => "Greece",
        "hk" => "Hong Kong",
        "hu" => "Hungary",
        "id" => "Indonesia",
        "ie" => "Ireland",
        "il" => "Israel",
        "in" => "India",
        "it" => "Italy",
        "jp" => "Japan",
        "kr" => "South Korea",
        "lt" => "Lithuania",
        "lv" => "Latvia",
        "ma" => "Morocco",
        "mx" => "Mexico",
        "my" => "Malaysia",
        "ng" => "Nigeria",
        "nl" => "Netherlands",
        "no" => "Norway",
        "nz" => "New Zealand",
        "ph" => "Philippines",
        "pl" => "Poland",
        "pt" => "Portugal",
        "ro" => "Romania",
        "rs" => "Serbia",
        "ru" => "Russia",
        "sa" => "Saudi Arabia",
        "se" => "Sweden",
        "sg" => "Singapore",
        "si" => "Slovenia",
        "sk" => "Slovakia",
        "th" => "Thailand",
        "tr" => "Turkey",
        "tw" => "Taiwan",
        "ua" => "Ukraine",
        "us" => "United States",
        "ve" => "Venezuela",
        "za" => "South Africa",
        other => return other.to_uppercase(),
    }
    .to_string()
}
