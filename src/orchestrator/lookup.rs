//! Lookup orchestrator
//!
//! Entry point for searches. A search splits the query into tokens, starts a
//! batch that resolves every token concurrently, and finalizes the status
//! once all of them are done.

use crate::catalog::Catalog;
use crate::config::Config;
use crate::orchestrator::cancel::{BatchToken, Generation};
use crate::orchestrator::constants::{STATUS_PROMPT, STATUS_SEARCHING};
use crate::orchestrator::resolver::{TokenOutcome, TokenResolver};
use crate::orchestrator::retry::RetryPolicy;
use crate::orchestrator::utils::tokenize;
use crate::state::SharedSearchState;
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{debug, info, info_span, warn, Instrument};

/// Result of a `search` call
///
/// Informational only; observers should read the shared state instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchSummary {
    /// The query was blank; nothing was looked up
    Blank,
    /// The batch ran to completion with this many results
    Completed {
        /// Number of records in the results
        found: usize,
    },
    /// The batch was cancelled or superseded by a newer search
    Cancelled,
}

/// Lookup orchestrator
///
/// Cheap to clone; clones share the catalog, state and cancellation counter.
#[derive(Clone)]
pub struct Orchestrator {
    catalog: Arc<dyn Catalog>,
    state: Arc<SharedSearchState>,
    generation: Generation,
    policy: RetryPolicy,
}

impl Orchestrator {
    /// Create an orchestrator with the default retry policy
    pub fn new(catalog: Arc<dyn Catalog>) -> Self {
        Self::with_policy(catalog, RetryPolicy::default())
    }

    /// Create an orchestrator using configured retry timing
    pub fn from_config(catalog: Arc<dyn Catalog>, config: &Config) -> Self {
        Self::with_policy(catalog, RetryPolicy::from_config(config))
    }

    /// Create an orchestrator with an explicit retry policy
    pub fn with_policy(catalog: Arc<dyn Catalog>, policy: RetryPolicy) -> Self {
        Self {
            catalog,
            state: Arc::new(SharedSearchState::new()),
            generation: Generation::new(),
            policy,
        }
    }

    /// Observable state
    pub fn state(&self) -> &Arc<SharedSearchState> {
        &self.state
    }

    /// Replace the query text without searching
    pub async fn set_query(&self, query: &str) {
        self.state.set_query(query).await;
    }

    /// Search using the current query text
    pub async fn submit(&self) -> SearchSummary {
        let query = self.state.query().await;
        self.run(&query).await
    }

    /// Search for `query`
    ///
    /// Cancels any running batch, clears the results and resolves every
    /// comma-separated token concurrently. Returns once the batch has been
    /// finalized. A blank query only sets a prompt status.
    pub async fn search(&self, query: &str) -> SearchSummary {
        self.state.set_query(query).await;
        self.run(query).await
    }

    /// Cancel the running batch, if any
    ///
    /// Tasks notice at their next checkpoint; the batch then finishes with a
    /// canceled status.
    pub fn cancel(&self) {
        info!(generation = self.generation.current(), "Cancelling current search");
        self.generation.cancel();
    }

    async fn run(&self, query: &str) -> SearchSummary {
        let tokens = tokenize(query);
        if tokens.is_empty() {
            self.state.set_status(STATUS_PROMPT).await;
            return SearchSummary::Blank;
        }

        let batch = self.generation.next_batch();
        let span = info_span!("batch", batch = batch.id(), tokens = tokens.len());

        // The driver is spawned so finalization still happens if the caller
        // stops polling this future.
        let driver = tokio::spawn(
            drive_batch(
                self.catalog.clone(),
                self.state.clone(),
                self.policy,
                batch,
                tokens,
            )
            .instrument(span),
        );

        match driver.await {
            Ok(summary) => summary,
            Err(e) => {
                warn!(error = %e, "Batch driver failed");
                SearchSummary::Cancelled
            }
        }
    }
}

/// Run one batch to completion and finalize its status
async fn drive_batch(
    catalog: Arc<dyn Catalog>,
    state: Arc<SharedSearchState>,
    policy: RetryPolicy,
    batch: BatchToken,
    tokens: Vec<String>,
) -> SearchSummary {
    if !state
        .begin_batch(&batch, tokens.clone(), STATUS_SEARCHING)
        .await
    {
        debug!("Batch superseded before it started");
        return SearchSummary::Cancelled;
    }
    info!(tokens = ?tokens, "Search started");

    let resolver = TokenResolver::new(catalog, state.clone(), policy, batch.clone());
    let mut last_failure = None;
    let mut tasks = JoinSet::new();
    for token in tokens {
        let resolver = resolver.clone();
        tasks.spawn(
            async move {
                let outcome = resolver.resolve(&token).await;
                (token, outcome)
            }
            .in_current_span(),
        );
    }

    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((token, TokenOutcome::Resolved(count))) => {
                debug!(token = %token, count = count, "Token resolved")
            }
            Ok((token, outcome)) => {
                debug!(token = %token, outcome = ?outcome, "Token unresolved");
                last_failure = outcome.failure_status().or(last_failure);
            }
            Err(e) => warn!(error = %e, "Token task failed"),
        }
    }

    match state.finish_batch(&batch, last_failure).await {
        Some(found) => {
            info!(found = found, "Search finished");
            SearchSummary::Completed { found }
        }
        None => {
            info!("Search canceled");
            SearchSummary::Cancelled
        }
    }
}
