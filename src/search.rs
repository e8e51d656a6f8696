use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use crate::catalog::Catalog;
use crate::models::{ListPage, Suggestion, NOT_AVAILABLE};
use crate::normalize::MAX_TOTAL_PAGES;

pub const SUGGESTION_LIMIT: usize = 8;

impl Catalog {
    pub async fn search(&self, query: &str) -> ListPage {
        self.search_page(query, 1).await
    }

    /// Blank queries return the empty page without touching the network.
    pub async fn search_page(&self, query: &str, page: u32) -> ListPage {
        let query = query.trim();
        if query.is_empty() {
            return ListPage::empty();
        }
        let page = page.clamp(1, MAX_TOTAL_PAGES);
        debug!(query, page, "Searching movies");
        match self.timed("search", self.api.search(query, page)).await {
            Ok(raw) => self.normalizer.list(&raw),
            Err(e) => {
                warn!(query, error = %e, "Search failed, returning empty page");
                ListPage::empty()
            }
        }
    }

    /// Type-ahead entries keyed by movie id, first occurrence wins.
    pub async fn suggestions(&self, query: &str) -> Vec<Suggestion> {
        let page = self.search(query).await;
        let mut seen = HashSet::new();
        page.movies
            .iter()
            .filter(|m| m.id != NOT_AVAILABLE && seen.insert(m.id.clone()))
            .take(SUGGESTION_LIMIT)
            .map(Suggestion::from)
            .collect()
    }
}

/// Latest-wins request counter. A response is kept only if its ticket is
/// still the newest one when it arrives.
#[derive(Debug, Clone, Default)]
pub struct Generation(Arc<AtomicU64>);

impl Generation {
    pub fn next(&self) -> u64 {
        self.0.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn is_current(&self, ticket: u64) -> bool {
        self.0.load(Ordering::SeqCst) == ticket
    }

    /// Makes every outstanding ticket stale.
    pub fn invalidate(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

/// Debounced type-ahead. Call [`DebouncedSearch::submit`] on every input
/// change; only the call that is still the latest after the quiet period
/// and after its response lands gets `Some`.
#[derive(Clone)]
pub struct DebouncedSearch {
    catalog: Arc<Catalog>,
    delay: Duration,
    generation: Generation,
}

impl DebouncedSearch {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        let delay = catalog.config().search_debounce;
        Self {
            catalog,
            delay,
            generation: Generation::default(),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub async fn submit(&self, query: &str) -> Option<Vec<Suggestion>> {
        let ticket = self.generation.next();
        if query.trim().is_empty() {
            return Some(Vec::new());
        }

        tokio::time::sleep(self.delay).await;
        if !self.generation.is_current(ticket) {
            return None;
        }

        let suggestions = self.catalog.suggestions(query).await;
        if !self.generation.is_current(ticket) {
            debug!(query, "Discarding stale search response");
            return None;
        }
        Some(suggestions)
    }

    /// Teardown: anything still in flight is discarded on arrival.
    pub fn cancel(&self) {
        self.generation.invalidate();
    }
}
