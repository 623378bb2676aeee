//! Batch cancellation
//!
//! A single generation counter is shared by the orchestrator and every task
//! it launched. Each batch holds a `BatchToken` with the generation it was
//! minted at; the batch is cancelled as soon as the counter moves on.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Shared generation counter
#[derive(Debug, Clone, Default)]
pub struct Generation(Arc<AtomicU64>);

impl Generation {
    /// Counter starting at generation 0 (no batch)
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancel whatever batch is current and mint a token for a new one
    pub fn next_batch(&self) -> BatchToken {
        let id = self.0.fetch_add(1, Ordering::SeqCst) + 1;
        BatchToken {
            generation: self.0.clone(),
            id,
        }
    }

    /// Cancel the current batch without starting another
    pub fn cancel(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }

    /// Current generation
    pub fn current(&self) -> u64 {
        self.0.load(Ordering::SeqCst)
    }
}

/// Cancellation token of one batch, passed by value into its tasks
#[derive(Debug, Clone)]
pub struct BatchToken {
    generation: Arc<AtomicU64>,
    id: u64,
}

impl BatchToken {
    /// Batch id
    pub fn id(&self) -> u64 {
        self.id
    }

    /// True once a newer batch started or `cancel()` was called
    pub fn is_cancelled(&self) -> bool {
        self.generation.load(Ordering::SeqCst) != self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_batch_cancels_previous() {
        let generation = Generation::new();
        let first = generation.next_batch();
        assert!(!first.is_cancelled());

        let second = generation.next_batch();
        assert!(first.is_cancelled());
        assert!(!second.is_cancelled());
        assert_eq!(second.id(), first.id() + 1);
    }

    #[test]
    fn test_cancel_without_new_batch() {
        let generation = Generation::new();
        let token = generation.next_batch();
        let copy = token.clone();

        generation.cancel();
        assert!(token.is_cancelled());
        assert!(copy.is_cancelled());
        assert_eq!(generation.current(), token.id() + 1);
    }
}
