//! Debounced live search
//!
//! Coalesces a rapidly-changing text input into at most one catalog query
//! per quiet period, keeping the visible result set consistent with the
//! latest input. A superseded scheduled query is aborted before it fires,
//! so no stale result can ever be applied. Catalog failures have already
//! been normalized to empty result sets by the client, so the component
//! only ever shows "no results", never an error.
use crate::{models::MovieSummary, services::catalog::CatalogProvider};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

pub const DEFAULT_QUIET_PERIOD: Duration = Duration::from_millis(300);

/// Dropdown-sized result cap
const RESULT_LIMIT: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchStatus {
    Idle,
    Loading,
    Ready,
}

/// The state visible to the owning view at any instant
#[derive(Debug, Clone, Serialize)]
pub struct SearchSnapshot {
    pub query: String,
    pub status: SearchStatus,
    pub results: Vec<MovieSummary>,
}

impl SearchSnapshot {
    fn idle() -> Self {
        Self {
            query: String::new(),
            status: SearchStatus::Idle,
            results: Vec::new(),
        }
    }
}

pub struct DebouncedSearch {
    catalog: Arc<dyn CatalogProvider>,
    quiet_period: Duration,
    snapshot: Arc<watch::Sender<SearchSnapshot>>,
    pending: Option<JoinHandle<()>>,
}

impl DebouncedSearch {
    pub fn new(catalog: Arc<dyn CatalogProvider>, quiet_period: Duration) -> Self {
        let (snapshot, _) = watch::channel(SearchSnapshot::idle());
        Self {
            catalog,
            quiet_period,
            snapshot: Arc::new(snapshot),
            pending: None,
        }
    }

    /// Observe snapshot changes
    pub fn subscribe(&self) -> watch::Receiver<SearchSnapshot> {
        self.snapshot.subscribe()
    }

    /// Feed one input change.
    ///
    /// Empty or whitespace-only input clears results and returns to idle
    /// with no network call. Anything else enters loading immediately and
    /// schedules a single query after the quiet period; a newer input
    /// aborts the pending schedule before it fires.
    pub fn input(&mut self, raw: &str) {
        if let Some(pending) = self.pending.take() {
            pending.abort();
        }

        let query = raw.trim();
        if query.is_empty() {
            self.snapshot.send_replace(SearchSnapshot::idle());
            return;
        }

        self.snapshot.send_replace(SearchSnapshot {
            query: query.to_string(),
            status: SearchStatus::Loading,
            results: Vec::new(),
        });

        let catalog = Arc::clone(&self.catalog);
        let snapshot = Arc::clone(&self.snapshot);
        let quiet_period = self.quiet_period;
        let query = query.to_string();

        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(quiet_period).await;
            let mut results = catalog.search(&query).await;
            results.truncate(RESULT_LIMIT);
            snapshot.send_replace(SearchSnapshot {
                query,
                status: SearchStatus::Ready,
                results,
            });
        }));
    }
}

impl Drop for DebouncedSearch {
    fn drop(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.abort();
        }
    }
}
