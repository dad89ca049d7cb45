use crate::models::{BookRecord, SearchFilters, SearchPage};
use crate::Result;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn};

/// Trait for search backends - keeps the session testable without a network
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait SearchProvider: Send + Sync {
    /// Issue exactly one request for `query` and normalize the results
    async fn search(&self, query: &str, filters: &SearchFilters) -> Result<SearchPage>;
}

/// What the caller sees after the latest search resolved
#[derive(Debug, Clone, Default)]
pub struct SearchState {
    pub records: Vec<BookRecord>,
    pub total_available: u64,
    pub current_query: String,
    pub error: Option<String>,
    in_flight: usize,
}

impl SearchState {
    pub fn is_loading(&self) -> bool {
        self.in_flight > 0
    }
}

/// Holds the current result set and drives searches against a provider
///
/// Searches may overlap. Nothing is cancelled or serialized: whichever
/// response resolves last overwrites the state, so callers that care should
/// not start a new search while one is in flight.
pub struct SearchSession {
    provider: Arc<dyn SearchProvider>,
    state: Arc<Mutex<SearchState>>,
}

impl SearchSession {
    pub fn new(provider: Arc<dyn SearchProvider>) -> Self {
        Self {
            provider,
            state: Arc::new(Mutex::new(SearchState::default())),
        }
    }

    /// Run a search and replace the current results with its outcome
    ///
    /// Blank queries are ignored: `Ok(None)`, no request, state untouched.
    /// On failure the results are cleared and the message kept in `error`.
    pub async fn search(&self, query: &str, filters: &SearchFilters) -> Result<Option<SearchPage>> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(None);
        }

        {
            let mut state = self.state.lock().await;
            state.in_flight += 1;
            state.error = None;
            state.current_query = query.to_string();
        }

        let outcome = self.provider.search(query, filters).await;

        let mut state = self.state.lock().await;
        state.in_flight = state.in_flight.saturating_sub(1);

        match outcome {
            Ok(page) => {
                info!(
                    "Search '{}' returned {} of {} results",
                    query,
                    page.records.len(),
                    page.total_available
                );
                state.records = page.records.clone();
                state.total_available = page.total_available;
                state.error = None;
                Ok(Some(page))
            }
            Err(err) => {
                warn!("Book search error: {}", err);
                state.records.clear();
                state.total_available = 0;
                state.error = Some(err.to_string());
                Err(err)
            }
        }
    }

    pub async fn clear_results(&self) {
        let mut state = self.state.lock().await;
        state.records.clear();
        state.error = None;
        state.total_available = 0;
        state.current_query.clear();
    }

    /// Copy of the current state
    pub async fn snapshot(&self) -> SearchState {
        self.state.lock().await.clone()
    }
}
