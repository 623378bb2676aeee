//! Retry policy
//!
//! Bounded attempts with a doubling delay between them.

use crate::config::Config;
use crate::orchestrator::constants::{INITIAL_RETRY_DELAY, MAX_ATTEMPTS};
use std::time::Duration;

/// How often and how patiently a lookup is retried
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Attempts per lookup, first try included
    pub max_attempts: u32,
    /// Delay after the first failure
    pub initial_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: MAX_ATTEMPTS,
            initial_delay: INITIAL_RETRY_DELAY,
        }
    }
}

impl RetryPolicy {
    /// Policy with the configured initial delay
    pub fn from_config(config: &Config) -> Self {
        Self {
            initial_delay: config.initial_delay(),
            ..Self::default()
        }
    }

    /// Fresh backoff state for one lookup
    pub fn backoff(&self) -> Backoff {
        Backoff {
            policy: *self,
            attempts: 0,
            next_delay: self.initial_delay,
        }
    }
}

/// Attempt counter for a single lookup
#[derive(Debug, Clone)]
pub struct Backoff {
    policy: RetryPolicy,
    attempts: u32,
    next_delay: Duration,
}

impl Backoff {
    /// Record a failed attempt
    ///
    /// Returns the delay to wait before the next attempt, or None once the
    /// attempt budget is spent.
    pub fn fail(&mut self) -> Option<Duration> {
        self.attempts += 1;
        if self.attempts >= self.policy.max_attempts {
            return None;
        }
        let delay = self.next_delay;
        self.next_delay = self.next_delay.saturating_mul(2);
        Some(delay)
    }

    /// Failed attempts so far
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Attempt budget
    pub fn max_attempts(&self) -> u32 {
        self.policy.max_attempts
    }
}
