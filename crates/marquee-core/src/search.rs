//! Search-as-you-type pipeline.
//!
//! [`LiveSearch`] connects a [`Debouncer`] to a [`QueryGate`]: raw input goes
//! in through [`LiveSearch::input`], debounced values are forwarded to the
//! gate by a background task, and the gate's [`QueryState`] comes out of
//! [`LiveSearch::subscribe`]. Dropping the pipeline stops the forwarding
//! task, which in turn drops the gate and aborts any in-flight request.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::api::MovieSearch;
use crate::config::AppConfig;
use crate::debounce::Debouncer;
use crate::query::{QueryGate, QueryState};

/// Timing and threshold settings for a [`LiveSearch`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LiveSearchOptions {
    pub delay: Duration,
    pub min_query_len: usize,
}

impl From<&AppConfig> for LiveSearchOptions {
    fn from(config: &AppConfig) -> Self {
        Self {
            delay: config.debounce_delay(),
            min_query_len: config.min_query_len,
        }
    }
}

pub struct LiveSearch {
    debouncer: Debouncer<String>,
    states: watch::Receiver<QueryState>,
    forwarder: JoinHandle<()>,
}

impl LiveSearch {
    /// Start a pipeline whose input begins as `initial_query`.
    ///
    /// A restored query that is long enough is searched right away.
    pub fn start<S: MovieSearch>(
        searcher: Arc<S>,
        options: LiveSearchOptions,
        initial_query: impl Into<String>,
    ) -> Self {
        let debouncer = Debouncer::new(initial_query.into(), options.delay);
        let mut gate = QueryGate::new(searcher, options.min_query_len);
        let states = gate.subscribe();
        let mut debounced = debouncer.subscribe();

        let forwarder = tokio::spawn(async move {
            let initial = debounced.borrow_and_update().clone();
            gate.submit(&initial);
            while debounced.changed().await.is_ok() {
                let query = debounced.borrow_and_update().clone();
                gate.submit(&query);
            }
        });

        Self {
            debouncer,
            states,
            forwarder,
        }
    }

    /// Record the current contents of the search input.
    pub fn input(&mut self, text: impl Into<String>) {
        self.debouncer.set(text.into());
    }

    /// Skip the remaining quiet period and search the current input now.
    pub fn flush(&mut self) {
        self.debouncer.flush();
    }

    /// Raw text as last entered.
    pub fn query(&self) -> &str {
        self.debouncer.input()
    }

    /// Text the gate is currently working with.
    pub fn debounced_query(&self) -> String {
        self.debouncer.current()
    }

    pub fn state(&self) -> QueryState {
        self.states.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<QueryState> {
        self.states.clone()
    }
}

impl Drop for LiveSearch {
    fn drop(&mut self) {
        self.forwarder.abort();
    }
}
