//! Debounced search state shared by the wizard forms

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Default debounce window for search-as-you-type fields
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// Collapses bursts of keystrokes so only the last one issues a request.
///
/// Each call to [`Debouncer::settle`] claims a new generation, waits out
/// the window, and reports whether it is still the latest caller. Only
/// the winner should go on to issue the network call; superseded callers
/// simply drop out. In-flight requests that were already issued are not
/// cancelled; stale responses lose at [`SearchField::resolve`] instead.
#[derive(Debug, Clone)]
pub struct Debouncer {
    window: Duration,
    generation: Arc<AtomicU64>,
}

impl Debouncer {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Wait out the debounce window; true when no newer call arrived
    pub async fn settle(&self) -> bool {
        let claimed = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        tokio::time::sleep(self.window).await;
        self.generation.load(Ordering::SeqCst) == claimed
    }

    /// Run `fetch` only if this caller survives the debounce window.
    ///
    /// Superseded callers return `None` without fetching.
    pub async fn run<F, Fut, T>(&self, fetch: F) -> Option<T>
    where
        F: FnOnce() -> Fut,
        Fut: std::future::Future<Output = T>,
    {
        if self.settle().await {
            Some(fetch().await)
        } else {
            None
        }
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}

/// A search-backed candidate list with sequence-stamped resolutions.
///
/// Every issued request gets a monotonically increasing sequence number
/// and a resolution is applied only if no newer resolution has landed.
/// The visible result set therefore always reflects the newest issued
/// search that has resolved; a response for an older request arriving
/// late can never overwrite it.
#[derive(Debug)]
pub struct SearchField<T> {
    query: String,
    results: Vec<T>,
    latest_issued: u64,
    applied: u64,
    error: Option<String>,
}

impl<T> SearchField<T> {
    pub fn new() -> Self {
        Self {
            query: String::new(),
            results: Vec::new(),
            latest_issued: 0,
            applied: 0,
            error: None,
        }
    }

    /// The query text of the most recently issued search
    pub fn query(&self) -> &str {
        &self.query
    }

    /// The visible result set
    pub fn results(&self) -> &[T] {
        &self.results
    }

    /// True while an issued search has not yet resolved or failed
    pub fn is_loading(&self) -> bool {
        self.applied < self.latest_issued
    }

    /// The error of the latest search, if it failed
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Record an issued search and return its sequence stamp
    pub fn begin_search(&mut self, query: &str) -> u64 {
        self.query = query.to_string();
        self.latest_issued += 1;
        self.latest_issued
    }

    /// Apply a resolved result set; returns false if it was stale
    pub fn resolve(&mut self, seq: u64, results: Vec<T>) -> bool {
        if seq <= self.applied {
            return false;
        }
        self.applied = seq;
        self.results = results;
        self.error = None;
        true
    }

    /// Record a failed search; stale failures are ignored
    pub fn fail(&mut self, seq: u64, error: impl Into<String>) -> bool {
        if seq <= self.applied {
            return false;
        }
        self.applied = seq;
        self.error = Some(error.into());
        true
    }

    /// Drop results, query and any pending stamps
    pub fn clear(&mut self) {
        self.query.clear();
        self.results.clear();
        self.error = None;
        self.applied = self.latest_issued;
    }
}

impl<T> Default for SearchField<T> {
    fn default() -> Self {
        Self::new()
    }
}
