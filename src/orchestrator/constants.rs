//! Orchestrator constants
//!
//! Retry limits, the category expansion cap, and the status messages shown
//! to observers.

use std::time::Duration;

/// Attempts per lookup (first try included)
pub const MAX_ATTEMPTS: u32 = 3;

/// Delay before the first retry; doubled after each further failure
pub const INITIAL_RETRY_DELAY: Duration = Duration::from_millis(1000);

/// Number of category members expanded into direct lookups
pub const MAX_CATEGORY_EXPANSIONS: usize = 5;

/// Status before the first search
pub const INITIAL_STATUS: &str = "...";

/// Status for a blank query
pub const STATUS_PROMPT: &str = "Please enter a Pokémon name, ID, or type.";

/// Status while a batch runs
pub const STATUS_SEARCHING: &str = "Searching...";

/// Status once something resolved
pub const STATUS_FOUND: &str = "Pokémon found!";

/// Batch finished without any result
pub const STATUS_NO_RESULTS: &str = "No Pokémon found.";

/// Batch was cancelled
pub const STATUS_CANCELED: &str = "Search canceled.";

/// Direct lookup answered with an empty record
pub const STATUS_NOT_FOUND: &str = "Pokémon not found.";

/// Identifier lookup ran out of attempts
pub const STATUS_DIRECT_EXHAUSTED: &str = "Error: Unable to find Pokémon after multiple attempts.";

/// Name lookup failed, trying it as a category
pub const STATUS_CHECKING_CATEGORY: &str = "Pokémon not found. Checking if it's a type...";

/// Category exists but has no members (or none resolved)
pub const STATUS_CATEGORY_EMPTY: &str = "No Pokémon found for this type.";

/// Category lookup ran out of attempts
pub const STATUS_CATEGORY_EXHAUSTED: &str = "Error: Unable to find Pokémon type.";

/// Status after a failed attempt with retries left
pub fn retry_status(attempt: u32, max_attempts: u32) -> String {
    format!("Attempt {}/{} failed. Retrying...", attempt, max_attempts)
}
