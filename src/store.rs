use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::article::Article;

/// Failure modes of the bookmark file, kept distinct so a corrupt store is
/// never silently treated as empty.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("bookmark file unreadable: {0}")]
    Io(#[from] std::io::Error),
    #[error("bookmark file corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Persisted collection of saved articles, unique by url.
///
/// The backing store is a single JSON array rewritten in full on every
/// mutation. That is fine for personal bookmark lists and keeps the on-disk
/// state in lockstep with the in-memory view; it is not meant for concurrent
/// multi-writer access.
pub struct BookmarkStore {
    path: PathBuf,
    articles: Vec<Article>,
}

impl BookmarkStore {
    /// Open the store at `path`. A missing file is an empty store; a file
    /// that exists but cannot be read or parsed is an error.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();

        let articles = match fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content)?,
            Err(e) if e.kind() == ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(e.into()),
        };

        info!("Loaded {} bookmarks from {}", articles.len(), path.display());
        Ok(Self { path, articles })
    }

    pub fn articles(&self) -> &[Article] {
        &self.articles
    }

    pub fn len(&self) -> usize {
        self.articles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.articles.is_empty()
    }

    pub fn contains(&self, url: &str) -> bool {
        self.articles.iter().any(|a| a.url == url)
    }

    /// Append the article unless its url is already present. Returns whether
    /// anything was added; the full collection is persisted before a `true`
    /// result is returned.
    pub fn add(&mut self, article: Article) -> Result<bool, StoreError> {
        if self.contains(&article.url) {
            return Ok(false);
        }

        self.articles.push(article);
        self.persist()?;
        Ok(true)
    }

    /// Remove the article with the given url. Removing an absent url is a
    /// no-op and does not touch the file.
    pub fn remove(&mut self, url: &str) -> Result<bool, StoreError> {
        let Some(index) = self.articles.iter().position(|a| a.url == url) else {
            return Ok(false);
        };

        self.articles.remove(index);
        self.persist()?;
        Ok(true)
    }

    /// Full-file rewrite via a temp file and rename, so a crash mid-write
    /// never leaves a torn bookmark file behind.
    fn persist(&self) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(&self.articles)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}
