//! Personalized feed assembly: derives interest terms from the user's
//! bookmarks and clicks, merges candidate articles fetched per term, and
//! labels each survivor with the reason it was recommended.

use crate::article::Article;
use crate::profile::InterestProfile;

/// Interest terms used to query for candidates, at most this many.
pub const MAX_INTEREST_TERMS: usize = 5;
/// Final size cap of the assembled feed.
pub const MAX_FEED_ARTICLES: usize = 15;

/// Leading title tokens taken from each bookmarked article.
const TITLE_TOKENS_PER_BOOKMARK: usize = 2;
/// A category becomes an interest term once clicked this often.
const CATEGORY_CLICK_THRESHOLD: u32 = 2;

/// Raised when no interaction has produced a single interest term yet.
/// Informational, not a failure: the caller shows an empty state.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
#[error("interact with articles to personalize your feed")]
pub struct NoInterestSignal;

/// Why an article appears in the personalized feed.
///
/// A fixed priority ladder, first matching rule wins:
/// 1. the top search term occurs in the title or description,
/// 2. the article's publisher has been clicked before,
/// 3. the user has saved articles,
/// 4. generic fallback.
///
/// Pure: the same article and profile always yield the same string.
pub fn reason_for(article: &Article, profile: &InterestProfile) -> String {
    if let Some(term) = profile.top_search_term() {
        let title = article.title.to_lowercase();
        let description = article
            .description
            .as_deref()
            .unwrap_or_default()
            .to_lowercase();
        if title.contains(term) || description.contains(term) {
            return format!("Because you searched for \"{}\"", term);
        }
    }

    if article
        .source
        .id
        .as_deref()
        .is_some_and(|id| profile.publisher_clicks(id) >= 1)
    {
        return "Based on publishers you read often".to_string();
    }

    if profile.saved_count() > 0 {
        return "Based on articles you saved".to_string();
    }

    "Recommended for you".to_string()
}

/// Derive up to [`MAX_INTEREST_TERMS`] query terms: the first two whitespace
/// tokens of each bookmarked title, then every category clicked at least
/// twice. Duplicates collapse to their first occurrence, so the result is
/// deterministic for a given store and profile.
pub fn interest_terms(
    bookmarks: &[Article],
    profile: &InterestProfile,
) -> Result<Vec<String>, NoInterestSignal> {
    let mut terms: Vec<String> = Vec::new();

    for article in bookmarks {
        for token in article
            .title
            .split_whitespace()
            .take(TITLE_TOKENS_PER_BOOKMARK)
        {
            if !terms.iter().any(|t| t == token) {
                terms.push(token.to_string());
            }
        }
    }

    for category in profile.categories_clicked_at_least(CATEGORY_CLICK_THRESHOLD) {
        if !terms.iter().any(|t| t == category) {
            terms.push(category.to_string());
        }
    }

    terms.truncate(MAX_INTEREST_TERMS);

    if terms.is_empty() {
        return Err(NoInterestSignal);
    }
    Ok(terms)
}

/// Concatenate per-term candidate batches in term order, deduplicate by url
/// keeping the first occurrence, and cap at [`MAX_FEED_ARTICLES`].
pub fn merge_candidates(batches: Vec<Vec<Article>>) -> Vec<Article> {
    let mut merged: Vec<Article> = Vec::new();

    for article in batches.into_iter().flatten() {
        if merged.len() == MAX_FEED_ARTICLES {
            break;
        }
        if !merged.iter().any(|a| a.url == article.url) {
            merged.push(article);
        }
    }

    merged
}
