//! Debounced place search behind the location input.
//!
//! Every keystroke replaces the query immediately and reschedules a single lookup
//! for after the quiet period. Rescheduling aborts the previous task, including a
//! lookup that already fired and is still waiting on the network, so at most one
//! lookup is in flight and a stale result never lands in the state.

use parking_lot::Mutex;
use std::{sync::Arc, time::Duration};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::{
    error::Operation,
    model::{LocationChosen, Place},
    provider::WeatherProvider,
};

/// Queries shorter than this never reach the provider.
pub const MIN_QUERY_CHARS: usize = 2;

/// How many suggestions a front end should list.
pub const MAX_VISIBLE_SUGGESTIONS: usize = 5;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchState {
    pub query: String,
    pub suggestions: Vec<Place>,
    pub searching: bool,
    pub error: Option<String>,
    pub suggestions_visible: bool,
}

#[derive(Debug)]
pub struct SearchController {
    provider: Arc<dyn WeatherProvider>,
    state: Arc<Mutex<SearchState>>,
    pending: Option<JoinHandle<()>>,
    debounce: Duration,
}

impl SearchController {
    pub fn new(provider: Arc<dyn WeatherProvider>, debounce: Duration) -> Self {
        Self { provider, state: Arc::default(), pending: None, debounce }
    }

    /// Handle a keystroke: store the text and (re)schedule the lookup.
    ///
    /// Must be called from within a tokio runtime.
    pub fn input(&mut self, text: impl Into<String>) {
        self.state.lock().query = text.into();
        self.cancel_pending();

        let provider = Arc::clone(&self.provider);
        let state = Arc::clone(&self.state);
        let debounce = self.debounce;

        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(debounce).await;
            lookup(provider.as_ref(), &state).await;
        }));
    }

    /// Wait until the scheduled lookup (if any) has fired and settled.
    pub async fn settle(&mut self) {
        if let Some(handle) = self.pending.take() {
            if let Err(e) = handle.await {
                if e.is_panic() {
                    warn!("suggestion lookup panicked");
                }
            }
        }
    }

    pub fn snapshot(&self) -> SearchState {
        self.state.lock().clone()
    }

    pub fn query(&self) -> String {
        self.state.lock().query.clone()
    }

    /// Suggestions a front end should list right now.
    pub fn visible_suggestions(&self) -> Vec<Place> {
        let state = self.state.lock();
        if !state.suggestions_visible {
            return Vec::new();
        }
        state.suggestions.iter().take(MAX_VISIBLE_SUGGESTIONS).cloned().collect()
    }

    /// Pick a suggestion by position. Replaces the query with the place's display
    /// name, hides the list and returns the event for the caller to act on.
    pub fn select(&mut self, index: usize) -> Option<LocationChosen> {
        self.cancel_pending();

        let mut state = self.state.lock();
        let chosen = LocationChosen::from(state.suggestions.get(index)?);

        debug!(name = %chosen.display_name, "location chosen");
        state.query = chosen.display_name.clone();
        state.suggestions_visible = false;
        Some(chosen)
    }

    /// Form submission: picks the top suggestion, or does nothing without one.
    pub fn submit(&mut self) -> Option<LocationChosen> {
        self.select(0)
    }

    /// Drop any pending lookup and start over with an empty input.
    pub fn clear(&mut self) {
        self.cancel_pending();
        *self.state.lock() = SearchState::default();
    }

    /// Abort the scheduled lookup. An aborted lookup never reaches its own
    /// cleanup, so the `searching` flag is cleared here.
    fn cancel_pending(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
            self.state.lock().searching = false;
        }
    }
}

impl Drop for SearchController {
    fn drop(&mut self) {
        self.cancel_pending();
    }
}

async fn lookup(provider: &dyn WeatherProvider, state: &Mutex<SearchState>) {
    let query = state.lock().query.clone();

    if query.chars().count() < MIN_QUERY_CHARS {
        let mut s = state.lock();
        s.suggestions.clear();
        s.suggestions_visible = false;
        s.searching = false;
        return;
    }

    {
        let mut s = state.lock();
        s.searching = true;
        s.error = None;
    }

    let result = provider.search_places(&query).await;

    let mut s = state.lock();
    match result {
        Ok(places) => {
            debug!(query = %query, matches = places.len(), "suggestions updated");
            s.suggestions = places;
            s.suggestions_visible = true;
        }
        Err(e) => {
            warn!(query = %query, error = %e, "place search failed");
            s.error = Some(e.user_message(Operation::Search));
            s.suggestions.clear();
            s.suggestions_visible = false;
        }
    }
    s.searching = false;
}
