//! Search request gating.
//!
//! A [`QueryGate`] receives debounced query text and decides whether to hit
//! the movie API. The outcome is published as a [`QueryState`] on a
//! [`watch`] channel. Each request is tagged with a generation number; a
//! newer submission aborts the in-flight request, and a response whose
//! generation is no longer current is dropped instead of being displayed.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::api::MovieSearch;
use crate::models::MovieSummary;

/// Queries of this many characters or fewer are not searched.
pub const DEFAULT_MIN_QUERY_LEN: usize = crate::config::DEFAULT_MIN_QUERY_LEN;

/// What the view should currently show for the search box
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum QueryState {
    /// Query too short to search
    Idle,
    /// Request in flight
    Loading { query: String },
    /// Request finished; `movies` may be empty
    Success {
        query: String,
        movies: Vec<MovieSummary>,
    },
    /// Request failed
    Failed { query: String, message: String },
}

impl QueryState {
    /// The query this state belongs to, if a search was attempted.
    pub fn query(&self) -> Option<&str> {
        match self {
            Self::Idle => None,
            Self::Loading { query } | Self::Success { query, .. } | Self::Failed { query, .. } => {
                Some(query)
            }
        }
    }

    pub const fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading { .. })
    }
}

/// Whether `query` is long enough to be searched.
pub fn is_searchable(query: &str, min_len: usize) -> bool {
    query.trim().chars().count() > min_len
}

pub struct QueryGate<S> {
    searcher: Arc<S>,
    min_len: usize,
    state: Arc<watch::Sender<QueryState>>,
    generation: Arc<AtomicU64>,
    in_flight: Option<JoinHandle<()>>,
}

impl<S: MovieSearch> QueryGate<S> {
    pub fn new(searcher: Arc<S>, min_len: usize) -> Self {
        let (state, _) = watch::channel(QueryState::Idle);
        Self {
            searcher,
            min_len,
            state: Arc::new(state),
            generation: Arc::new(AtomicU64::new(0)),
            in_flight: None,
        }
    }

    /// Handle a new debounced query.
    ///
    /// Short queries move the gate to `Idle`. A searchable query that is
    /// already loading or displayed is ignored; a failed one is retried.
    /// Anything else supersedes the in-flight request and enters `Loading`.
    pub fn submit(&mut self, query: &str) {
        let query = query.trim();

        if !is_searchable(query, self.min_len) {
            let generation = &self.generation;
            self.state.send_if_modified(|state| {
                generation.fetch_add(1, Ordering::AcqRel);
                if state.is_idle() {
                    return false;
                }
                *state = QueryState::Idle;
                true
            });
            self.abort_in_flight();
            tracing::debug!("query {:?} below search threshold; idle", query);
            return;
        }

        let unchanged = match &*self.state.borrow() {
            QueryState::Loading { query: current } | QueryState::Success { query: current, .. } => {
                current == query
            }
            QueryState::Idle | QueryState::Failed { .. } => false,
        };
        if unchanged {
            return;
        }

        let mut request_generation = 0;
        self.state.send_modify(|state| {
            request_generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
            *state = QueryState::Loading {
                query: query.to_string(),
            };
        });
        self.abort_in_flight();

        let searcher = Arc::clone(&self.searcher);
        let state = Arc::clone(&self.state);
        let generation = Arc::clone(&self.generation);
        let query = query.to_string();
        tracing::debug!("searching {:?} (request {})", query, request_generation);

        self.in_flight = Some(tokio::spawn(async move {
            let result = searcher.search(&query).await;
            state.send_if_modified(|current| {
                if generation.load(Ordering::Acquire) != request_generation {
                    tracing::debug!("discarding stale response for {:?}", query);
                    return false;
                }
                *current = match result {
                    Ok(movies) => {
                        tracing::debug!("{} result(s) for {:?}", movies.len(), query);
                        QueryState::Success { query, movies }
                    }
                    Err(error) => {
                        tracing::warn!("search for {:?} failed: {}", query, error);
                        QueryState::Failed {
                            query,
                            message: error.to_string(),
                        }
                    }
                };
                true
            });
        }));
    }

    pub fn state(&self) -> QueryState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<QueryState> {
        self.state.subscribe()
    }

    pub const fn min_len(&self) -> usize {
        self.min_len
    }

    fn abort_in_flight(&mut self) {
        if let Some(handle) = self.in_flight.take() {
            handle.abort();
        }
    }
}

impl<S> Drop for QueryGate<S> {
    fn drop(&mut self) {
        self.generation.fetch_add(1, Ordering::AcqRel);
        if let Some(handle) = self.in_flight.take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::api::{ApiError, ApiResult};
    use crate::models::{MediaType, MovieDetails, MovieId, Poster};
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::time::Duration;
    use tokio::time::sleep;

    #[derive(Clone)]
    enum Scripted {
        Movies(Vec<MovieSummary>),
        Fail(String),
    }

    /// Search double with per-query latency and canned outcomes.
    #[derive(Default)]
    pub struct MockSearch {
        script: Mutex<HashMap<String, (Duration, Scripted)>>,
        calls: Mutex<Vec<String>>,
    }

    impl MockSearch {
        pub fn respond(self, query: &str, latency: Duration, movies: Vec<MovieSummary>) -> Self {
            self.script
                .lock()
                .unwrap()
                .insert(query.to_string(), (latency, Scripted::Movies(movies)));
            self
        }

        pub fn fail(self, query: &str, latency: Duration, message: &str) -> Self {
            self.script.lock().unwrap().insert(
                query.to_string(),
                (latency, Scripted::Fail(message.to_string())),
            );
            self
        }

        pub fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl MovieSearch for MockSearch {
        async fn search(&self, query: &str) -> ApiResult<Vec<MovieSummary>> {
            self.calls.lock().unwrap().push(query.to_string());
            let scripted = self.script.lock().unwrap().get(query).cloned();
            let (latency, outcome) =
                scripted.unwrap_or((Duration::ZERO, Scripted::Movies(Vec::new())));
            sleep(latency).await;
            match outcome {
                Scripted::Movies(movies) => Ok(movies),
                Scripted::Fail(message) => Err(ApiError::NoResults(message)),
            }
        }

        async fn details(&self, id: &MovieId) -> ApiResult<MovieDetails> {
            Err(ApiError::NotFound(format!("{id} is not scripted")))
        }
    }

    pub fn movie(id: &str, title: &str) -> MovieSummary {
        MovieSummary {
            id: id.parse().unwrap(),
            title: title.to_string(),
            year: "2005".to_string(),
            poster: Poster::Unavailable,
            media_type: MediaType::Movie,
        }
    }

    const LATENCY: Duration = Duration::from_millis(50);

    #[tokio::test(start_paused = true)]
    async fn short_queries_never_search() {
        let searcher = Arc::new(MockSearch::default());
        let mut gate = QueryGate::new(Arc::clone(&searcher), DEFAULT_MIN_QUERY_LEN);

        for query in ["", "b", "ba", "  ba  "] {
            gate.submit(query);
            assert_eq!(gate.state(), QueryState::Idle);
        }
        sleep(Duration::from_secs(1)).await;

        assert!(searcher.calls().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn success_keeps_results_in_order() {
        let searcher = Arc::new(MockSearch::default().respond(
            "bat",
            LATENCY,
            vec![movie("tt0372784", "Batman Begins"), movie("tt0096895", "Batman")],
        ));
        let mut gate = QueryGate::new(Arc::clone(&searcher), DEFAULT_MIN_QUERY_LEN);
        let mut rx = gate.subscribe();

        gate.submit("bat");
        assert_eq!(
            gate.state(),
            QueryState::Loading {
                query: "bat".to_string()
            }
        );

        let state = rx
            .wait_for(|state| !state.is_loading())
            .await
            .unwrap()
            .clone();
        assert_eq!(
            state,
            QueryState::Success {
                query: "bat".to_string(),
                movies: vec![movie("tt0372784", "Batman Begins"), movie("tt0096895", "Batman")],
            }
        );
        assert_eq!(searcher.calls(), vec!["bat".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn failure_exposes_exact_message() {
        let searcher = Arc::new(MockSearch::default().fail("bat", LATENCY, "API Error"));
        let mut gate = QueryGate::new(searcher, DEFAULT_MIN_QUERY_LEN);
        let mut rx = gate.subscribe();

        gate.submit("bat");
        let state = rx
            .wait_for(|state| !state.is_loading())
            .await
            .unwrap()
            .clone();

        assert_eq!(
            state,
            QueryState::Failed {
                query: "bat".to_string(),
                message: "API Error".to_string(),
            }
        );
    }

    #[tokio::test(start_paused = true)]
    async fn empty_result_is_success_not_idle() {
        let searcher = Arc::new(MockSearch::default().respond("zzz", LATENCY, Vec::new()));
        let mut gate = QueryGate::new(searcher, DEFAULT_MIN_QUERY_LEN);
        let mut rx = gate.subscribe();

        gate.submit("zzz");
        let state = rx
            .wait_for(|state| !state.is_loading())
            .await
            .unwrap()
            .clone();

        assert_eq!(
            state,
            QueryState::Success {
                query: "zzz".to_string(),
                movies: Vec::new(),
            }
        );
        assert!(!state.is_idle());
    }

    #[tokio::test(start_paused = true)]
    async fn superseded_response_is_never_displayed() {
        let searcher = Arc::new(
            MockSearch::default()
                .respond("batman", Duration::from_millis(300), vec![movie("tt1", "Batman")])
                .respond("joker", LATENCY, vec![movie("tt2", "Joker")]),
        );
        let mut gate = QueryGate::new(Arc::clone(&searcher), DEFAULT_MIN_QUERY_LEN);

        gate.submit("batman");
        sleep(Duration::from_millis(10)).await;
        gate.submit("joker");
        sleep(Duration::from_secs(1)).await;

        assert_eq!(
            gate.state(),
            QueryState::Success {
                query: "joker".to_string(),
                movies: vec![movie("tt2", "Joker")],
            }
        );
        assert_eq!(searcher.calls(), vec!["batman".to_string(), "joker".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn shrinking_below_threshold_ignores_in_flight_result() {
        let searcher = Arc::new(MockSearch::default().respond(
            "batman",
            Duration::from_millis(300),
            vec![movie("tt1", "Batman")],
        ));
        let mut gate = QueryGate::new(searcher, DEFAULT_MIN_QUERY_LEN);

        gate.submit("batman");
        sleep(Duration::from_millis(10)).await;
        gate.submit("ba");
        sleep(Duration::from_secs(1)).await;

        assert_eq!(gate.state(), QueryState::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn repeated_query_does_not_search_again() {
        let searcher = Arc::new(MockSearch::default().respond("bat", LATENCY, Vec::new()));
        let mut gate = QueryGate::new(Arc::clone(&searcher), DEFAULT_MIN_QUERY_LEN);

        gate.submit("bat");
        gate.submit(" bat ");
        sleep(Duration::from_secs(1)).await;
        gate.submit("bat");
        sleep(Duration::from_secs(1)).await;

        assert_eq!(searcher.calls().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn failed_query_is_retried_on_resubmit() {
        let searcher = Arc::new(MockSearch::default().fail("bat", LATENCY, "API Error"));
        let mut gate = QueryGate::new(Arc::clone(&searcher), DEFAULT_MIN_QUERY_LEN);

        gate.submit("bat");
        sleep(Duration::from_secs(1)).await;
        gate.submit("bat");
        sleep(Duration::from_secs(1)).await;

        assert_eq!(searcher.calls().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn gate_drop_discards_in_flight_result() {
        let searcher = Arc::new(MockSearch::default().respond(
            "batman",
            Duration::from_millis(300),
            vec![movie("tt1", "Batman")],
        ));
        let mut gate = QueryGate::new(Arc::clone(&searcher), DEFAULT_MIN_QUERY_LEN);
        let rx = gate.subscribe();

        gate.submit("batman");
        sleep(Duration::from_millis(10)).await;
        drop(gate);
        sleep(Duration::from_secs(1)).await;

        assert_eq!(
            *rx.borrow(),
            QueryState::Loading {
                query: "batman".to_string()
            }
        );
        assert_eq!(searcher.calls(), vec!["batman".to_string()]);
    }

    #[test]
    fn searchable_counts_characters_after_trimming() {
        assert!(!is_searchable("ab", 2));
        assert!(!is_searchable("  ab ", 2));
        assert!(is_searchable("bat", 2));
        assert!(is_searchable("été", 2));
        assert!(is_searchable("a", 0));
    }
}
