//! Error types for catalog lookups
//!
//! Every failure a lookup can hit is a `LookupError`. The orchestrator never
//! hands these to its caller; it turns them into retries or status messages.

use thiserror::Error;

/// Lookup error types
///
/// `Request`, `Status` and `Parse` are transient and worth retrying.
/// The remaining variants are terminal for the lookup that produced them.
#[derive(Error, Debug)]
pub enum LookupError {
    /// The HTTP request could not be sent or its body could not be read
    #[error("Request to catalog failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The catalog answered with a non-success status
    #[error("Catalog returned error status {status}: {body}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body, as far as it could be read
        body: String,
    },

    /// The response body did not have the expected shape
    #[error("Failed to parse catalog response: {0}")]
    Parse(#[from] serde_json::Error),

    /// The configured base URL cannot carry a lookup path
    #[error("Invalid catalog URL: {0}")]
    InvalidUrl(String),

    /// Well-formed response without a record
    #[error("No record found for '{0}'")]
    NotFound(String),

    /// Every attempt failed with a transient error
    #[error("Giving up after {attempts} attempts: {source}")]
    Exhausted {
        /// Number of attempts made
        attempts: u32,
        /// Error from the final attempt
        source: Box<LookupError>,
    },

    /// The owning batch was cancelled before the lookup finished
    #[error("Lookup canceled")]
    Cancelled,
}

impl LookupError {
    /// Whether another attempt could succeed
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            LookupError::Request(_) | LookupError::Status { .. } | LookupError::Parse(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_classification() {
        let status = LookupError::Status {
            status: 404,
            body: "Not Found".to_string(),
        };
        assert!(status.is_transient());

        let parse = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        assert!(LookupError::from(parse).is_transient());

        assert!(!LookupError::NotFound("missingno".to_string()).is_transient());
        assert!(!LookupError::Cancelled.is_transient());
    }

    #[test]
    fn test_exhausted_message_includes_last_error() {
        let err = LookupError::Exhausted {
            attempts: 3,
            source: Box::new(LookupError::Status {
                status: 503,
                body: "unavailable".to_string(),
            }),
        };
        let msg = err.to_string();
        assert!(msg.contains("3 attempts"));
        assert!(msg.contains("503"));
    }
}
