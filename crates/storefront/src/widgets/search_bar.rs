//! Search-as-you-type suggestion flow.
//!
//! # State machine
//!
//! ```text
//!            debounced query < 2 chars
//!   ┌──────────────────────────────────────────┐
//!   ▼                                          │
//! Idle ── debounced query ≥ 2 chars ──▶ Pending{seq} ── response(seq) ──▶ Showing
//!   ▲                                          │                            │
//!   └──── failure / empty list / select / submit ───────────────────────────┘
//! ```
//!
//! Each request is tagged with a sequence number. A response is applied only
//! while the state is still `Pending` with the same tag, so a slow response
//! for an older query can never overwrite a newer one. Selecting or submitting
//! closes the dropdown and invalidates every in-flight request.

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::debounce::{Debouncer, SEARCH_DEBOUNCE};
use crate::api::ApiError;

/// Shortest query, in characters after trimming, that requests suggestions.
pub const MIN_QUERY_CHARS: usize = 2;

/// Suggestions requested per query.
pub const SUGGESTION_LIMIT: u32 = 8;

/// Anything that can answer a suggestion request.
pub trait SuggestionSource: Send + Sync + 'static {
    /// Suggestions for `prefix`, at most `limit` of them.
    fn suggestions(
        &self,
        prefix: &str,
        limit: u32,
    ) -> impl Future<Output = Result<Vec<String>, ApiError>> + Send;
}

/// Whether `query` is long enough to request suggestions for.
#[must_use]
pub fn is_suggestible(query: &str) -> bool {
    query.trim().chars().count() >= MIN_QUERY_CHARS
}

/// Search page URL for a query.
#[must_use]
pub fn search_url(query: &str) -> String {
    format!("/search?q={}", urlencoding::encode(query))
}

/// Dropdown state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SuggestionState {
    /// Dropdown closed.
    #[default]
    Idle,
    /// A request for `query` tagged `seq` is in flight.
    Pending { seq: u64, query: String },
    /// Dropdown open with suggestions for `query`.
    Showing {
        query: String,
        suggestions: Vec<String>,
    },
}

impl SuggestionState {
    /// Suggestions currently shown.
    #[must_use]
    pub fn suggestions(&self) -> &[String] {
        match self {
            Self::Showing { suggestions, .. } => suggestions,
            _ => &[],
        }
    }

    /// Whether the dropdown is open.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        matches!(self, Self::Showing { .. })
    }
}

/// What a select or submit did. Exactly one of these happens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// The search callback was invoked with this query.
    Callback(String),
    /// The caller should navigate to this URL.
    Navigate(String),
    /// Nothing to search for.
    Ignored,
}

/// Hook invoked instead of navigating when a search is chosen.
pub type SearchCallback = Arc<dyn Fn(&str) + Send + Sync>;

struct Shared<S> {
    source: S,
    state: watch::Sender<SuggestionState>,
    seq: AtomicU64,
    dismissed: AtomicBool,
    limit: u32,
}

impl<S: SuggestionSource> Shared<S> {
    fn next_seq(&self) -> u64 {
        self.seq.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn on_debounced(self: &Arc<Self>, value: &str) {
        if self.dismissed.load(Ordering::SeqCst) {
            return;
        }

        let query = value.trim();
        if !is_suggestible(query) {
            self.next_seq();
            self.state.send_replace(SuggestionState::Idle);
            return;
        }

        let seq = self.next_seq();
        let query = query.to_string();
        self.state.send_replace(SuggestionState::Pending {
            seq,
            query: query.clone(),
        });

        let shared = Arc::clone(self);
        tokio::spawn(async move {
            let result = shared.source.suggestions(&query, shared.limit).await;
            shared.apply(seq, query, result);
        });
    }

    fn apply(&self, seq: u64, query: String, result: Result<Vec<String>, ApiError>) {
        let applied = self.state.send_if_modified(|state| match state {
            SuggestionState::Pending { seq: current, .. } if *current == seq => {
                *state = match &result {
                    Ok(suggestions) if !suggestions.is_empty() => SuggestionState::Showing {
                        query: query.clone(),
                        suggestions: suggestions.clone(),
                    },
                    Ok(_) => SuggestionState::Idle,
                    Err(e) => {
                        warn!(error = %e, query = %query, "Suggestion request failed");
                        SuggestionState::Idle
                    }
                };
                true
            }
            _ => false,
        });

        if !applied {
            debug!(seq, query = %query, "Discarding stale suggestion response");
        }
    }

    fn dismiss(&self) {
        self.dismissed.store(true, Ordering::SeqCst);
        self.next_seq();
        self.state.send_replace(SuggestionState::Idle);
    }
}

/// A search box with debounced suggestions.
///
/// Must be created inside a Tokio runtime. Dropping it stops the debounce
/// and dispatch tasks.
pub struct SearchBar<S> {
    shared: Arc<Shared<S>>,
    input: watch::Sender<String>,
    state: watch::Receiver<SuggestionState>,
    on_search: Option<SearchCallback>,
    _debouncer: Debouncer<String>,
    driver: JoinHandle<()>,
}

impl<S: SuggestionSource> SearchBar<S> {
    /// Create a search bar that asks `source` for suggestions.
    #[must_use]
    pub fn new(source: S) -> Self {
        Self::with_limit(source, SUGGESTION_LIMIT)
    }

    /// Create a search bar requesting at most `limit` suggestions.
    #[must_use]
    pub fn with_limit(source: S, limit: u32) -> Self {
        let (input, input_rx) = watch::channel(String::new());
        let (state_tx, state) = watch::channel(SuggestionState::Idle);
        let debouncer = Debouncer::spawn(input_rx, SEARCH_DEBOUNCE);

        let shared = Arc::new(Shared {
            source,
            state: state_tx,
            seq: AtomicU64::new(0),
            dismissed: AtomicBool::new(false),
            limit,
        });

        let mut debounced = debouncer.subscribe();
        let driver_shared = Arc::clone(&shared);
        let driver = tokio::spawn(async move {
            while debounced.changed().await.is_ok() {
                let value = debounced.borrow_and_update().clone();
                driver_shared.on_debounced(&value);
            }
        });

        Self {
            shared,
            input,
            state,
            on_search: None,
            _debouncer: debouncer,
            driver,
        }
    }

    /// Invoke `callback` instead of navigating when a search is chosen.
    #[must_use]
    pub fn on_search(mut self, callback: impl Fn(&str) + Send + Sync + 'static) -> Self {
        self.on_search = Some(Arc::new(callback));
        self
    }

    /// Replace the input text.
    pub fn input(&self, value: impl Into<String>) {
        self.shared.dismissed.store(false, Ordering::SeqCst);
        self.input.send_replace(value.into());
    }

    /// Current input text.
    #[must_use]
    pub fn value(&self) -> String {
        self.input.borrow().clone()
    }

    /// Current dropdown state.
    #[must_use]
    pub fn state(&self) -> SuggestionState {
        self.state.borrow().clone()
    }

    /// A receiver notified on every state change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SuggestionState> {
        self.state.clone()
    }

    /// Choose a suggestion: it becomes the input text and is searched.
    pub fn select(&self, suggestion: &str) -> SearchOutcome {
        self.shared.dismiss();
        self.input.send_replace(suggestion.to_string());
        self.dispatch(suggestion.trim())
    }

    /// Search for the current input text.
    pub fn submit(&self) -> SearchOutcome {
        let query = self.input.borrow().trim().to_string();
        if query.is_empty() {
            return SearchOutcome::Ignored;
        }
        self.shared.dismiss();
        self.dispatch(&query)
    }

    fn dispatch(&self, query: &str) -> SearchOutcome {
        if query.is_empty() {
            return SearchOutcome::Ignored;
        }
        match &self.on_search {
            Some(callback) => {
                callback(query);
                SearchOutcome::Callback(query.to_string())
            }
            None => SearchOutcome::Navigate(search_url(query)),
        }
    }
}

impl<S> Drop for SearchBar<S> {
    fn drop(&mut self) {
        self.driver.abort();
    }
}

impl<S> fmt::Debug for SearchBar<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchBar")
            .field("value", &*self.input.borrow())
            .field("state", &*self.state.borrow())
            .field("has_callback", &self.on_search.is_some())
            .finish_non_exhaustive()
    }
}
