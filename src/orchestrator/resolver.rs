//! Per-token resolution
//!
//! Each token walks a fixed sequence of stages:
//!
//! ```text
//! Direct ──(name token, no match)──> Category ──(members)──> Expand ──> done
//!   │                                    │
//!   └─(identifier token)─> done          └─(empty / exhausted)─> done
//! ```
//!
//! Expansion runs plain direct lookups for at most five members and never
//! re-enters the category stage, so resolution always terminates after two
//! levels.

use crate::catalog::{Catalog, CreatureRecord};
use crate::error::LookupError;
use crate::orchestrator::cancel::BatchToken;
use crate::orchestrator::constants::{
    retry_status, MAX_CATEGORY_EXPANSIONS, STATUS_CATEGORY_EMPTY, STATUS_CATEGORY_EXHAUSTED,
    STATUS_CHECKING_CATEGORY, STATUS_DIRECT_EXHAUSTED, STATUS_NOT_FOUND,
};
use crate::orchestrator::retry::RetryPolicy;
use crate::orchestrator::utils::is_identifier;
use crate::state::SharedSearchState;
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// How a token's resolution ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenOutcome {
    /// At least one record was resolved (direct hit or category expansion)
    Resolved(usize),
    /// The catalog confirmed there is nothing under this token
    NotFound,
    /// The category exists but none of its expanded members resolved
    CategoryEmpty,
    /// Transient failures used up the direct lookup's attempt budget
    Exhausted,
    /// Transient failures used up the category lookup's attempt budget
    CategoryExhausted,
    /// The batch was cancelled; nothing was contributed
    Cancelled,
}

impl TokenOutcome {
    /// Status message the token ended on, for tokens that contributed nothing
    pub fn failure_status(&self) -> Option<&'static str> {
        match self {
            TokenOutcome::NotFound => Some(STATUS_NOT_FOUND),
            TokenOutcome::CategoryEmpty => Some(STATUS_CATEGORY_EMPTY),
            TokenOutcome::Exhausted => Some(STATUS_DIRECT_EXHAUSTED),
            TokenOutcome::CategoryExhausted => Some(STATUS_CATEGORY_EXHAUSTED),
            TokenOutcome::Resolved(_) | TokenOutcome::Cancelled => None,
        }
    }
}

/// Resolution stages of a single token
#[derive(Debug)]
enum Stage {
    Direct,
    Category,
    Expand(Vec<String>),
}

/// Resolves tokens on behalf of one batch
#[derive(Clone)]
pub struct TokenResolver {
    catalog: Arc<dyn Catalog>,
    state: Arc<SharedSearchState>,
    policy: RetryPolicy,
    batch: BatchToken,
}

impl TokenResolver {
    /// Create a resolver bound to `batch`
    pub fn new(
        catalog: Arc<dyn Catalog>,
        state: Arc<SharedSearchState>,
        policy: RetryPolicy,
        batch: BatchToken,
    ) -> Self {
        Self {
            catalog,
            state,
            policy,
            batch,
        }
    }

    /// Resolve one token and merge what it found into the shared results
    ///
    /// Records are collected locally and merged once, when the token is done.
    /// A cancelled batch merges nothing.
    pub async fn resolve(&self, token: &str) -> TokenOutcome {
        let mut found = Vec::new();
        let outcome = self.run(token, &mut found).await;

        if !found.is_empty() {
            let merged = self.state.merge_results(&self.batch, found).await;
            debug!(token = %token, merged = merged, "Merged token results");
        }

        debug!(token = %token, outcome = ?outcome, "Token resolution finished");
        outcome
    }

    async fn run(&self, token: &str, found: &mut Vec<CreatureRecord>) -> TokenOutcome {
        let identifier = is_identifier(token);
        let mut stage = Stage::Direct;

        loop {
            stage = match stage {
                Stage::Direct => match self.lookup_creature(token).await {
                    Ok(record) => {
                        found.push(record);
                        return TokenOutcome::Resolved(found.len());
                    }
                    Err(LookupError::Cancelled) => return TokenOutcome::Cancelled,
                    Err(err) if identifier => return self.direct_failed(token, &err).await,
                    Err(err) => {
                        debug!(
                            token = %token,
                            error = %err,
                            "Direct lookup failed, trying category"
                        );
                        self.status(STATUS_CHECKING_CATEGORY).await;
                        Stage::Category
                    }
                },
                Stage::Category => match self.lookup_category(token).await {
                    Ok(members) if members.is_empty() => {
                        self.status(STATUS_CATEGORY_EMPTY).await;
                        return TokenOutcome::CategoryEmpty;
                    }
                    Ok(members) => {
                        Stage::Expand(members.into_iter().take(MAX_CATEGORY_EXPANSIONS).collect())
                    }
                    Err(LookupError::Cancelled) => return TokenOutcome::Cancelled,
                    Err(LookupError::NotFound(_)) => {
                        self.status(STATUS_CATEGORY_EMPTY).await;
                        return TokenOutcome::CategoryEmpty;
                    }
                    Err(err) => {
                        warn!(token = %token, error = %err, "Category lookup failed");
                        self.status(STATUS_CATEGORY_EXHAUSTED).await;
                        return TokenOutcome::CategoryExhausted;
                    }
                },
                Stage::Expand(members) => {
                    info!(token = %token, members = members.len(), "Expanding category");
                    for member in &members {
                        match self.lookup_creature(member).await {
                            Ok(record) => found.push(record),
                            Err(LookupError::Cancelled) => return TokenOutcome::Cancelled,
                            Err(err) => {
                                self.direct_failed(member, &err).await;
                            }
                        }
                    }

                    if found.is_empty() {
                        self.status(STATUS_CATEGORY_EMPTY).await;
                        return TokenOutcome::CategoryEmpty;
                    }
                    return TokenOutcome::Resolved(found.len());
                }
            };
        }
    }

    async fn direct_failed(&self, name: &str, err: &LookupError) -> TokenOutcome {
        match err {
            LookupError::NotFound(_) => {
                self.status(STATUS_NOT_FOUND).await;
                TokenOutcome::NotFound
            }
            _ => {
                warn!(token = %name, error = %err, "Lookup gave up");
                self.status(STATUS_DIRECT_EXHAUSTED).await;
                TokenOutcome::Exhausted
            }
        }
    }

    async fn lookup_creature(&self, name: &str) -> Result<CreatureRecord, LookupError> {
        self.with_retry(name, || self.catalog.creature(name)).await
    }

    async fn lookup_category(&self, name: &str) -> Result<Vec<String>, LookupError> {
        self.with_retry(name, || self.catalog.category_members(name)).await
    }

    async fn status(&self, status: &str) {
        self.state.set_batch_status(&self.batch, status).await;
    }

    /// Run `op` under the retry policy
    ///
    /// Cancellation is checked before every attempt. Non-transient errors end
    /// the loop immediately.
    async fn with_retry<T, F, Fut>(&self, name: &str, mut op: F) -> Result<T, LookupError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, LookupError>>,
    {
        let mut backoff = self.policy.backoff();

        loop {
            if self.batch.is_cancelled() {
                debug!(
                    token = %name,
                    batch = self.batch.id(),
                    "Batch cancelled, abandoning lookup"
                );
                return Err(LookupError::Cancelled);
            }

            let err = match op().await {
                Ok(value) => return Ok(value),
                Err(err) if !err.is_transient() => return Err(err),
                Err(err) => err,
            };

            match backoff.fail() {
                Some(delay) => {
                    self.status(&retry_status(backoff.attempts(), backoff.max_attempts()))
                        .await;
                    info!(
                        token = %name,
                        attempt = backoff.attempts(),
                        max_attempts = backoff.max_attempts(),
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "Lookup failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
                None => {
                    return Err(LookupError::Exhausted {
                        attempts: backoff.attempts(),
                        source: Box::new(err),
                    })
                }
            }
        }
    }
}
