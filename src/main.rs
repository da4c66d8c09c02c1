mod article;
mod config;
mod feed;
mod newsapi;
mod profile;
mod routes;
mod store;

use std::sync::Arc;

use axum::{routing::get, Router};
use tokio::sync::{Mutex, RwLock};
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::newsapi::NewsClient;
use crate::profile::InterestProfile;
use crate::routes::AppState;
use crate::store::BookmarkStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "headline_hub=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::load("config.toml")?;
    let api_key = config.resolve_api_key()?;
    info!(
        "Loaded configuration: {} categories, {} favorite sources",
        config.categories.len(),
        config.favorite_sources.len()
    );

    // Open the bookmark store; a corrupt file is a startup error rather than
    // a silently emptied collection.
    let store = BookmarkStore::open(&config.bookmark_file)?;

    let news = NewsClient::new(&config, api_key);

    // Create app state; the interest profile starts empty each session.
    let state = Arc::new(AppState {
        config,
        news,
        store: Mutex::new(store),
        profile: RwLock::new(InterestProfile::new()),
    });

    // Build router
    let app = Router::new()
        .route("/health", get(routes::health))
        .route("/headlines", get(routes::headlines))
        .route("/search", get(routes::search))
        .route("/publishers", get(routes::publishers))
        .route("/publishers/:id/headlines", get(routes::publisher_headlines))
        .route(
            "/bookmarks",
            get(routes::list_bookmarks)
                .post(routes::save_bookmark)
                .delete(routes::remove_bookmark),
        )
        .route("/foryou", get(routes::for_you))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
    info!("Server starting on http://localhost:3000");

    axum::serve(listener, app).await?;

    Ok(())
}
