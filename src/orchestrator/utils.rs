//! Orchestrator utility functions
//!
//! Query tokenization, token classification and record formatting.

use crate::catalog::CreatureRecord;

/// Split raw input into lookup tokens
///
/// Splits on commas, trims and lower-cases each part, drops empty parts.
pub fn tokenize(query: &str) -> Vec<String> {
    query
        .split(',')
        .map(|part| part.trim().to_lowercase())
        .filter(|part| !part.is_empty())
        .collect()
}

/// Whether a token is a numeric identifier (no category fallback)
///
/// Only values that fit a 32-bit signed integer count; anything wider is
/// treated as a name.
pub fn is_identifier(token: &str) -> bool {
    token.parse::<i32>().is_ok()
}

/// Human-readable detail text for a record
pub fn format_detail(record: &CreatureRecord) -> String {
    format!(
        "Name: {}\nHeight: {}\nWeight: {}\nTypes: {}",
        record.name,
        record.height,
        record.weight,
        record.categories.join(", ")
    )
}
