use std::collections::BTreeMap;

/// Counts-by-key signal map.
///
/// Backed by an ordered map so `top` has a stable tie-break: among keys with
/// the maximum count, the lexicographically smallest wins, run after run.
#[derive(Debug, Clone, Default)]
pub struct Counter {
    counts: BTreeMap<String, u32>,
}

impl Counter {
    pub fn track(&mut self, key: &str) {
        *self.counts.entry(key.to_string()).or_insert(0) += 1;
    }

    pub fn count(&self, key: &str) -> u32 {
        self.counts.get(key).copied().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// The key with the maximum count, if any. Ties keep the first key in
    /// map order.
    pub fn top(&self) -> Option<&str> {
        let mut best: Option<(&str, u32)> = None;
        for (key, count) in &self.counts {
            if best.map_or(true, |(_, c)| *count > c) {
                best = Some((key.as_str(), *count));
            }
        }
        best.map(|(key, _)| key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.counts.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

/// Per-session interest signals for one user.
///
/// Four independent signals accumulate from interactions: category clicks,
/// publisher clicks, search terms, and the number of saved articles. The
/// profile starts empty at session start and is not persisted.
#[derive(Debug, Clone, Default)]
pub struct InterestProfile {
    category_clicks: Counter,
    publisher_clicks: Counter,
    search_terms: Counter,
    saved_count: u32,
}

impl InterestProfile {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn track_category(&mut self, category: &str) {
        self.category_clicks.track(category);
    }

    pub fn track_publisher(&mut self, source_id: &str) {
        self.publisher_clicks.track(source_id);
    }

    /// Search terms are case-folded, so "AI" and "ai" accumulate into one
    /// counter.
    pub fn track_search(&mut self, term: &str) {
        self.search_terms.track(&term.to_lowercase());
    }

    pub fn record_save(&mut self) {
        self.saved_count += 1;
    }

    pub fn record_unsave(&mut self) {
        self.saved_count = self.saved_count.saturating_sub(1);
    }

    pub fn saved_count(&self) -> u32 {
        self.saved_count
    }

    pub fn has_search_terms(&self) -> bool {
        !self.search_terms.is_empty()
    }

    /// Highest-count search term, already lowercase.
    pub fn top_search_term(&self) -> Option<&str> {
        self.search_terms.top()
    }

    /// Lookup is folded the same way tracking is.
    pub fn search_term_count(&self, term: &str) -> u32 {
        self.search_terms.count(&term.to_lowercase())
    }

    pub fn publisher_clicks(&self, source_id: &str) -> u32 {
        self.publisher_clicks.count(source_id)
    }

    pub fn category_clicks(&self, category: &str) -> u32 {
        self.category_clicks.count(category)
    }

    /// Categories clicked at least `threshold` times, in stable order.
    pub fn categories_clicked_at_least(&self, threshold: u32) -> Vec<&str> {
        self.category_clicks
            .iter()
            .filter(|(_, count)| *count >= threshold)
            .map(|(category, _)| category)
            .collect()
    }
}
