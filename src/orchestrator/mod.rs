//! Orchestrator module
//!
//! Resolves search queries against the catalog: retry with backoff, category
//! fallback, and cooperative cancellation of superseded batches.

pub mod cancel;
pub mod constants;
pub mod lookup;
pub mod resolver;
pub mod retry;
pub mod utils;

pub use lookup::{Orchestrator, SearchSummary};
pub use resolver::TokenOutcome;
pub use retry::RetryPolicy;
