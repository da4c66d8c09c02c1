//! Integration tests for the headline-hub news reader
//!
//! These tests verify the full workflow from configuration loading through
//! bookmark persistence and personalized feed assembly.

use headline_hub::article::{Article, ArticleSource};

mod common {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    /// Create a temporary directory for test bookmark files
    pub fn create_temp_dir() -> TempDir {
        tempfile::tempdir().expect("Failed to create temp directory")
    }

    pub fn bookmark_path(temp_dir: &TempDir) -> PathBuf {
        temp_dir.path().join("bookmarks.json")
    }

    pub fn article(url: &str, title: &str) -> Article {
        Article {
            source: ArticleSource::default(),
            title: title.to_string(),
            description: None,
            url: url.to_string(),
            url_to_image: None,
            published_at: None,
        }
    }

    pub fn article_from(url: &str, title: &str, source_id: &str) -> Article {
        let mut a = article(url, title);
        a.source = ArticleSource {
            id: Some(source_id.to_string()),
            name: Some(source_id.to_string()),
        };
        a
    }
}

#[cfg(test)]
mod config_integration_tests {
    use headline_hub::config::Config;

    #[test]
    fn test_load_actual_config() {
        // Test loading the actual config.toml from the project
        let config = Config::load("config.toml");
        assert!(config.is_ok(), "Failed to load config.toml: {:?}", config.err());

        let config = config.unwrap();
        assert!(!config.categories.is_empty(), "config.toml should list categories");
        assert!(
            !config.favorite_sources.is_empty(),
            "config.toml should list favorite sources"
        );
        assert!(config.search_ttl > 0, "TTLs should be positive");
    }
}

#[cfg(test)]
mod store_integration_tests {
    use super::common::*;
    use headline_hub::store::BookmarkStore;

    #[test]
    fn test_full_bookmark_workflow() {
        let temp_dir = create_temp_dir();
        let path = bookmark_path(&temp_dir);

        let mut store = BookmarkStore::open(&path).unwrap();
        assert!(store.is_empty());

        // Save a handful of articles
        for i in 1..=5 {
            let added = store
                .add(article(
                    &format!("https://news.example.com/{}", i),
                    &format!("Article {}", i),
                ))
                .unwrap();
            assert!(added);
        }
        assert_eq!(store.len(), 5);

        // Saving the same url again changes nothing
        assert!(!store
            .add(article("https://news.example.com/3", "Article 3 Again"))
            .unwrap());
        assert_eq!(store.len(), 5);

        // Remove one, then a nonexistent one
        assert!(store.remove("https://news.example.com/2").unwrap());
        assert!(!store.remove("https://news.example.com/2").unwrap());
        assert_eq!(store.len(), 4);
    }

    #[test]
    fn test_bookmarks_persist_across_sessions() {
        let temp_dir = create_temp_dir();
        let path = bookmark_path(&temp_dir);

        // First session: save articles
        {
            let mut store = BookmarkStore::open(&path).unwrap();
            store
                .add(article("https://persistent.com/1", "Persistent Article"))
                .unwrap();
        }

        // Second session: the collection is still there
        {
            let store = BookmarkStore::open(&path).unwrap();
            assert_eq!(store.len(), 1);
            assert_eq!(store.articles()[0].title, "Persistent Article");
            assert!(store.contains("https://persistent.com/1"));
        }
    }
}

#[cfg(test)]
mod personalization_tests {
    use super::common::*;
    use headline_hub::feed::{self, NoInterestSignal, MAX_FEED_ARTICLES};
    use headline_hub::profile::InterestProfile;

    #[test]
    fn test_empty_profile_and_no_bookmarks_has_no_signal() {
        let profile = InterestProfile::new();
        assert_eq!(feed::interest_terms(&[], &profile), Err(NoInterestSignal));
    }

    #[test]
    fn test_bookmark_seeds_interest_terms() {
        let profile = InterestProfile::new();
        let bookmarks = vec![article("https://a.com", "Global Markets Rally")];

        let terms = feed::interest_terms(&bookmarks, &profile).unwrap();
        assert!(terms.contains(&"Global".to_string()));
        assert!(terms.contains(&"Markets".to_string()));
        assert!(!terms.contains(&"Rally".to_string()));
    }

    #[test]
    fn test_reason_priority_over_full_profile() {
        // A profile with all three signals set: the search rule must win.
        let mut profile = InterestProfile::new();
        profile.track_search("markets");
        profile.track_publisher("bbc-news");
        profile.record_save();

        let a = article_from("https://a.com", "Global Markets Rally", "bbc-news");
        assert_eq!(
            feed::reason_for(&a, &profile),
            "Because you searched for \"markets\""
        );

        // Dropping the search match falls through to the publisher rule.
        let b = article_from("https://b.com", "Sports Tonight", "bbc-news");
        assert_eq!(
            feed::reason_for(&b, &profile),
            "Based on publishers you read often"
        );

        // And an unknown publisher falls through to the saved rule.
        let c = article_from("https://c.com", "Sports Tonight", "unknown-wire");
        assert_eq!(feed::reason_for(&c, &profile), "Based on articles you saved");
    }

    #[test]
    fn test_feed_cap_from_many_candidates() {
        // 30 distinct candidates across two term batches: at most 15 survive,
        // first-seen order preserved.
        let batch1: Vec<_> = (0..20)
            .map(|i| article(&format!("https://one.com/{}", i), "One"))
            .collect();
        let batch2: Vec<_> = (0..10)
            .map(|i| article(&format!("https://two.com/{}", i), "Two"))
            .collect();

        let merged = feed::merge_candidates(vec![batch1, batch2]);
        assert_eq!(merged.len(), MAX_FEED_ARTICLES);
        assert_eq!(merged[0].url, "https://one.com/0");
        assert_eq!(merged[14].url, "https://one.com/14");
    }
}

#[cfg(test)]
mod end_to_end_tests {
    use super::common::*;
    use headline_hub::config::Config;
    use headline_hub::feed;
    use headline_hub::newsapi::NewsClient;
    use headline_hub::profile::InterestProfile;
    use headline_hub::store::BookmarkStore;
    use futures::future::join_all;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn candidate_body(url: &str, title: &str) -> serde_json::Value {
        serde_json::json!({
            "status": "ok",
            "totalResults": 1,
            "articles": [{
                "source": {"id": null, "name": "Example Wire"},
                "title": title,
                "description": "desc",
                "url": url,
                "urlToImage": null,
                "publishedAt": "2024-12-09T12:00:00Z"
            }]
        })
    }

    async fn test_client(server: &MockServer) -> NewsClient {
        let config = Config::from_str(&format!(r#"base_url = "{}""#, server.uri())).unwrap();
        NewsClient::new(&config, "test-key".to_string())
    }

    #[tokio::test]
    async fn test_bookmark_to_personalized_feed() {
        // Bookmark one article titled "Global Markets Rally"; the derived
        // terms seed per-term queries, and with an otherwise empty profile
        // every candidate gets the generic reason.
        let temp_dir = create_temp_dir();
        let mut store = BookmarkStore::open(bookmark_path(&temp_dir)).unwrap();
        store
            .add(article("https://saved.com/rally", "Global Markets Rally"))
            .unwrap();

        let profile = InterestProfile::new();
        let terms = feed::interest_terms(store.articles(), &profile).unwrap();
        assert_eq!(terms, vec!["Global", "Markets"]);

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v2/everything"))
            .and(query_param("q", "Global"))
            .respond_with(ResponseTemplate::new(200).set_body_json(candidate_body(
                "https://candidate.com/global",
                "Global Trade Update",
            )))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v2/everything"))
            .and(query_param("q", "Markets"))
            .respond_with(ResponseTemplate::new(200).set_body_json(candidate_body(
                "https://candidate.com/markets",
                "Markets Close Higher",
            )))
            .mount(&server)
            .await;

        let client = test_client(&server).await;
        let batches = join_all(terms.iter().map(|t| client.feed_candidates(t))).await;
        let candidates = feed::merge_candidates(batches);

        assert_eq!(candidates.len(), 2);
        for candidate in &candidates {
            assert_eq!(feed::reason_for(candidate, &profile), "Recommended for you");
        }
    }

    #[tokio::test]
    async fn test_search_interaction_shapes_feed_reasons() {
        // A user who searched "trade" sees matching candidates explained by
        // that search, and non-matching ones fall down the ladder.
        let mut profile = InterestProfile::new();
        profile.track_search("Trade");
        profile.track_category("business");
        profile.track_category("business");

        let terms = feed::interest_terms(&[], &profile).unwrap();
        assert_eq!(terms, vec!["business"]);

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v2/everything"))
            .and(query_param("q", "business"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "status": "ok",
                "totalResults": 2,
                "articles": [
                    {
                        "source": {"id": null, "name": "Wire"},
                        "title": "Trade Talks Resume",
                        "description": null,
                        "url": "https://candidate.com/trade",
                        "urlToImage": null,
                        "publishedAt": "2024-12-09T12:00:00Z"
                    },
                    {
                        "source": {"id": null, "name": "Wire"},
                        "title": "Quarterly Earnings Roundup",
                        "description": null,
                        "url": "https://candidate.com/earnings",
                        "urlToImage": null,
                        "publishedAt": "2024-12-09T12:00:00Z"
                    }
                ]
            })))
            .mount(&server)
            .await;

        let client = test_client(&server).await;
        let batches = join_all(terms.iter().map(|t| client.feed_candidates(t))).await;
        let candidates = feed::merge_candidates(batches);
        assert_eq!(candidates.len(), 2);

        assert_eq!(
            feed::reason_for(&candidates[0], &profile),
            "Because you searched for \"trade\""
        );
        // No publisher id, no saves: generic fallback.
        assert_eq!(
            feed::reason_for(&candidates[1], &profile),
            "Recommended for you"
        );
    }

    #[tokio::test]
    async fn test_duplicate_candidates_across_terms_collapse() {
        let profile = InterestProfile::new();
        let bookmarks = vec![article("https://saved.com/a", "Mars Landing")];
        let terms = feed::interest_terms(&bookmarks, &profile).unwrap();
        assert_eq!(terms, vec!["Mars", "Landing"]);

        // Both term queries return the same article.
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v2/everything"))
            .respond_with(ResponseTemplate::new(200).set_body_json(candidate_body(
                "https://candidate.com/same",
                "Mars Landing Confirmed",
            )))
            .mount(&server)
            .await;

        let client = test_client(&server).await;
        let batches = join_all(terms.iter().map(|t| client.feed_candidates(t))).await;
        let candidates = feed::merge_candidates(batches);

        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].url, "https://candidate.com/same");
    }

    #[tokio::test]
    async fn test_failed_term_queries_degrade_to_smaller_feed() {
        let profile = InterestProfile::new();
        let bookmarks = vec![article("https://saved.com/a", "Quantum Computing")];
        let terms = feed::interest_terms(&bookmarks, &profile).unwrap();

        // Only the "Quantum" query succeeds; "Computing" gets a 500.
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v2/everything"))
            .and(query_param("q", "Quantum"))
            .respond_with(ResponseTemplate::new(200).set_body_json(candidate_body(
                "https://candidate.com/quantum",
                "Quantum Leap",
            )))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v2/everything"))
            .and(query_param("q", "Computing"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = test_client(&server).await;
        let batches = join_all(terms.iter().map(|t| client.feed_candidates(t))).await;
        let candidates = feed::merge_candidates(batches);

        // The failure never surfaces; the feed is just smaller.
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].url, "https://candidate.com/quantum");
    }
}
