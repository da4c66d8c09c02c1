//! Headline Hub - A Personalized News Reader
//!
//! This crate fetches articles from a news API and serves a JSON interface
//! for browsing by category, publisher, and search term, saving bookmarks,
//! and a "For You" feed built from the user's own interactions.

pub mod article;
pub mod config;
pub mod feed;
pub mod newsapi;
pub mod profile;
pub mod routes;
pub mod store;
