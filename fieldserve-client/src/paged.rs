//! Incremental fetch-append-dedupe controller for infinitely scrolled,
//! searchable lists (clients, stock products).
//!
//! One controller instance drives one list view for one screen session.
//! State lives behind a mutex so the UI can issue `set_query` while a
//! `load_more` is still in flight; every fetch is tagged with a generation
//! and completions from a superseded query are discarded wholesale.

use crate::events::EventDispatcher;
use async_trait::async_trait;
use fieldserve_core::{ApiResult, Identified, Page};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::Mutex;

/// The search/sort pair a list is currently filtered by.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageQuery {
    pub search: String,
    pub sort: String,
}

/// Where pages come from. Implemented over HTTP by the adapters in
/// [`crate::http`] and by in-memory fakes in tests.
#[async_trait]
pub trait PageSource<T>: Send + Sync {
    async fn fetch_page(&self, page: u32, query: &PageQuery) -> ApiResult<Page<T>>;
}

struct ListState<T> {
    items: Vec<T>,
    /// Ids already in `items`; the de-dup index for appends.
    seen: HashSet<i64>,
    next_page: u32,
    has_more: bool,
    loading: bool,
    query: PageQuery,
    generation: u64,
    error: Option<String>,
}

/// Read-only view handed to the UI collaborator.
#[derive(Debug, Clone)]
pub struct ListSnapshot<T> {
    pub items: Vec<T>,
    pub loading: bool,
    pub has_more: bool,
    pub error: Option<String>,
    pub query: PageQuery,
}

pub struct PagedList<T> {
    state: Mutex<ListState<T>>,
    source: Arc<dyn PageSource<T>>,
    events: Arc<EventDispatcher>,
}

impl<T: Identified + Clone + Send> PagedList<T> {
    pub fn new(source: Arc<dyn PageSource<T>>) -> Self {
        Self {
            state: Mutex::new(ListState {
                items: Vec::new(),
                seen: HashSet::new(),
                next_page: 1,
                has_more: true,
                loading: false,
                query: PageQuery::default(),
                generation: 0,
                error: None,
            }),
            source,
            events: Arc::new(EventDispatcher::new()),
        }
    }

    pub fn events(&self) -> Arc<EventDispatcher> {
        self.events.clone()
    }

    /// Replace the query and reload from page 1.
    ///
    /// The reset deliberately ignores the loading gate: a query change must
    /// win over any in-flight `load_more`, whose completion will see a stale
    /// generation and discard itself. Debouncing keystrokes is the caller's
    /// concern ([`crate::debounce::Debouncer`]).
    pub async fn set_query(&self, search: &str, sort: &str) {
        let (generation, query) = {
            let mut state = self.state.lock().await;
            state.generation += 1;
            state.query = PageQuery {
                search: search.to_string(),
                sort: sort.to_string(),
            };
            state.loading = true;
            state.error = None;
            (state.generation, state.query.clone())
        };
        tracing::debug!(search = %query.search, sort = %query.sort, "list query reset");

        let result = self.source.fetch_page(1, &query).await;

        let mut state = self.state.lock().await;
        if state.generation != generation {
            tracing::debug!("discarding reset response from a superseded query");
            return;
        }
        state.loading = false;
        match result {
            Ok(page) => {
                let has_more = page.has_more();
                state.items.clear();
                state.seen.clear();
                for item in page.data {
                    // Full replace; the id index only guards against a
                    // single page containing duplicates.
                    if state.seen.insert(item.item_id()) {
                        state.items.push(item);
                    }
                }
                state.next_page = 2;
                state.has_more = has_more;
                self.events.emit_list_updated(state.items.len());
            }
            Err(err) => {
                tracing::warn!(error = %err, "list reset fetch failed");
                let message = err.user_message();
                state.error = Some(message.clone());
                self.events.emit_error(&message);
            }
        }
    }

    /// Fetch and append the next page. No-op while a fetch is in flight or
    /// once the last page has been reached.
    pub async fn load_more(&self) {
        let (generation, page_number, query) = {
            let mut state = self.state.lock().await;
            if state.loading || !state.has_more {
                return;
            }
            state.loading = true;
            (state.generation, state.next_page, state.query.clone())
        };

        let result = self.source.fetch_page(page_number, &query).await;

        let mut state = self.state.lock().await;
        if state.generation != generation {
            // The query changed underneath us; the reset owns the loading
            // flag now.
            tracing::debug!(page = page_number, "discarding page from a superseded query");
            return;
        }
        state.loading = false;
        match result {
            Ok(page) => {
                let has_more = page.has_more();
                for item in page.data {
                    if state.seen.insert(item.item_id()) {
                        state.items.push(item);
                    }
                }
                state.next_page = page_number + 1;
                state.has_more = has_more;
                state.error = None;
                self.events.emit_list_updated(state.items.len());
            }
            Err(err) => {
                // Page number was not advanced, so the next call retries it.
                tracing::warn!(page = page_number, error = %err, "page fetch failed");
                let message = err.user_message();
                state.error = Some(message.clone());
                self.events.emit_error(&message);
            }
        }
    }

    pub async fn snapshot(&self) -> ListSnapshot<T> {
        let state = self.state.lock().await;
        ListSnapshot {
            items: state.items.clone(),
            loading: state.loading,
            has_more: state.has_more,
            error: state.error.clone(),
            query: state.query.clone(),
        }
    }

    pub async fn items(&self) -> Vec<T> {
        self.state.lock().await.items.clone()
    }
}
