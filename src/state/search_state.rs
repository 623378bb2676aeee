// Search state management
// Holds the observable fields a presentation layer binds to

use crate::catalog::CreatureRecord;
use crate::orchestrator::cancel::BatchToken;
use crate::orchestrator::constants::{
    INITIAL_STATUS, STATUS_CANCELED, STATUS_FOUND, STATUS_NO_RESULTS,
};
use crate::orchestrator::utils::format_detail;
use serde::Serialize;
use tokio::sync::{broadcast, RwLock};

/// Capacity of the change notification channel
const CHANGE_CHANNEL_CAPACITY: usize = 256;

/// Snapshot of everything an observer can see
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchState {
    /// Raw user input
    pub query: String,
    /// Tokens of the current batch
    pub tokens: Vec<String>,
    /// Resolved records in completion order
    pub results: Vec<CreatureRecord>,
    /// Progress/result message
    pub status: String,
    /// 0 at batch start, 100 once something resolved
    pub progress: f64,
    /// Detail text of the most recently resolved record
    pub detail: Option<String>,
    /// Image of the most recently resolved record
    pub image_url: Option<String>,
    /// Batch that currently owns this state (0 = none yet)
    pub batch: u64,
}

impl Default for SearchState {
    fn default() -> Self {
        Self {
            query: String::new(),
            tokens: Vec::new(),
            results: Vec::new(),
            status: INITIAL_STATUS.to_string(),
            progress: 0.0,
            detail: None,
            image_url: None,
            batch: 0,
        }
    }
}

/// Field-level change notifications
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StateChange {
    /// Query text changed
    Query {
        /// New query text
        query: String,
    },
    /// A new batch took ownership; results were cleared
    BatchStarted {
        /// Batch id
        batch: u64,
        /// Tokens the batch will resolve
        tokens: Vec<String>,
    },
    /// Status message changed
    Status {
        /// New status message
        status: String,
    },
    /// Progress changed
    Progress {
        /// New progress value
        progress: f64,
    },
    /// Detail text changed
    Detail {
        /// New detail text
        detail: String,
    },
    /// Primary image changed
    Image {
        /// New image URL (None when the record has no sprite)
        image_url: Option<String>,
    },
    /// A record was appended to the results
    ResultAdded {
        /// The appended record
        record: CreatureRecord,
    },
}

/// Shared, observable search state
///
/// All mutation goes through this type. Writes on behalf of a batch take a
/// `BatchToken` and are dropped once that batch has been cancelled or
/// superseded; the check happens under the write lock.
#[derive(Debug)]
pub struct SharedSearchState {
    inner: RwLock<SearchState>,
    changes: broadcast::Sender<StateChange>,
}

impl Default for SharedSearchState {
    fn default() -> Self {
        Self::new()
    }
}

impl SharedSearchState {
    /// Create state with initial values
    pub fn new() -> Self {
        let (changes, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        Self {
            inner: RwLock::new(SearchState::default()),
            changes,
        }
    }

    /// Subscribe to change notifications
    pub fn subscribe(&self) -> broadcast::Receiver<StateChange> {
        self.changes.subscribe()
    }

    /// Clone the current state
    pub async fn snapshot(&self) -> SearchState {
        self.inner.read().await.clone()
    }

    /// Current query text
    pub async fn query(&self) -> String {
        self.inner.read().await.query.clone()
    }

    fn notify(&self, change: StateChange) {
        // No receivers is fine
        let _ = self.changes.send(change);
    }

    /// Replace the query text
    pub async fn set_query(&self, query: &str) {
        let mut state = self.inner.write().await;
        if state.query != query {
            state.query = query.to_string();
            self.notify(StateChange::Query {
                query: query.to_string(),
            });
        }
    }

    /// Set the status regardless of which batch owns the state
    pub async fn set_status(&self, status: &str) {
        let mut state = self.inner.write().await;
        self.write_status(&mut state, status);
    }

    fn write_status(&self, state: &mut SearchState, status: &str) {
        if state.status != status {
            state.status = status.to_string();
            self.notify(StateChange::Status {
                status: status.to_string(),
            });
        }
    }

    fn owns(state: &SearchState, token: &BatchToken) -> bool {
        state.batch == token.id() && !token.is_cancelled()
    }

    /// Hand the state to a new batch: clear results, reset progress
    ///
    /// Returns false if `token` was already superseded.
    pub async fn begin_batch(
        &self,
        token: &BatchToken,
        tokens: Vec<String>,
        status: &str,
    ) -> bool {
        let mut state = self.inner.write().await;
        if token.is_cancelled() {
            return false;
        }
        state.batch = token.id();
        state.tokens = tokens.clone();
        state.results.clear();
        state.progress = 0.0;
        self.notify(StateChange::BatchStarted {
            batch: token.id(),
            tokens,
        });
        self.notify(StateChange::Progress { progress: 0.0 });
        self.write_status(&mut state, status);
        true
    }

    /// Set the status on behalf of a batch
    ///
    /// Returns false (and writes nothing) if the batch no longer owns the state.
    pub async fn set_batch_status(&self, token: &BatchToken, status: &str) -> bool {
        let mut state = self.inner.write().await;
        if !Self::owns(&state, token) {
            return false;
        }
        self.write_status(&mut state, status);
        true
    }

    /// Append a token's records to the results
    ///
    /// Detail text and image follow the last merged record.
    /// Returns the number of records appended (0 if the batch lost ownership).
    pub async fn merge_results(&self, token: &BatchToken, records: Vec<CreatureRecord>) -> usize {
        let mut state = self.inner.write().await;
        if !Self::owns(&state, token) || records.is_empty() {
            return 0;
        }

        let merged = records.len();
        for record in records {
            let detail = format_detail(&record);
            state.detail = Some(detail.clone());
            self.notify(StateChange::Detail { detail });

            state.image_url = record.image_url.clone();
            self.notify(StateChange::Image {
                image_url: record.image_url.clone(),
            });

            state.results.push(record.clone());
            self.notify(StateChange::ResultAdded { record });
        }

        if state.progress != 100.0 {
            state.progress = 100.0;
            self.notify(StateChange::Progress { progress: 100.0 });
        }
        self.write_status(&mut state, STATUS_FOUND);
        merged
    }

    /// Write the batch-level status once all token tasks are done
    ///
    /// Any result wins over token failures. Without results the batch ends on
    /// `last_failure` (the most recent token failure message) or the generic
    /// no-results message. A batch superseded by a newer one leaves the state
    /// alone. Returns the number of results the batch finished with, or None
    /// if it was cancelled or superseded.
    pub async fn finish_batch(
        &self,
        token: &BatchToken,
        last_failure: Option<&str>,
    ) -> Option<usize> {
        let mut state = self.inner.write().await;
        if state.batch != token.id() {
            return None;
        }
        if token.is_cancelled() {
            self.write_status(&mut state, STATUS_CANCELED);
            return None;
        }

        let found = state.results.len();
        let status = if found > 0 {
            STATUS_FOUND
        } else {
            last_failure.unwrap_or(STATUS_NO_RESULTS)
        };
        self.write_status(&mut state, status);
        Some(found)
    }
}
