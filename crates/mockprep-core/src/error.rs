//! Error types for the interview engine.
//!
//! `ServiceError` covers every way an external capability can fail. Those
//! failures are always recovered by a fallback and never reach the caller.
//! `InterviewError` is what the engine itself surfaces.

use thiserror::Error;

/// Errors that can occur when calling the question-generation or
/// answer-evaluation capability.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ServiceError {
    /// No capability is configured (offline mode).
    #[error("no interview service configured")]
    NotConfigured,

    /// The request did not complete within its bound.
    #[error("request timed out after {0}s")]
    Timeout(u64),

    /// A network error occurred.
    #[error("network error: {0}")]
    Network(String),

    /// The service answered with a non-success status.
    #[error("API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    /// The response body could not be turned into the expected shape.
    #[error("malformed payload: {0}")]
    MalformedPayload(String),
}

impl ServiceError {
    /// Returns `true` when the service was simply not set up, as opposed to
    /// failing at runtime. Used to keep offline mode quiet in the logs.
    pub fn is_offline(&self) -> bool {
        matches!(self, ServiceError::NotConfigured)
    }
}

/// Errors surfaced by the engine to its caller.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InterviewError {
    /// Rejected input: empty answer, missing criterion, out-of-range score.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A role/round/difficulty/company/criterion key that the catalogs do not know.
    #[error("unknown {kind}: {key}")]
    UnknownCatalogKey { kind: &'static str, key: String },
}

impl InterviewError {
    pub(crate) fn unknown(kind: &'static str, key: impl Into<String>) -> Self {
        InterviewError::UnknownCatalogKey {
            kind,
            key: key.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages() {
        assert_eq!(
            ServiceError::Timeout(15).to_string(),
            "request timed out after 15s"
        );
        assert_eq!(
            InterviewError::unknown("role", "devops").to_string(),
            "unknown role: devops"
        );
    }

    #[test]
    fn offline_classification() {
        assert!(ServiceError::NotConfigured.is_offline());
        assert!(!ServiceError::Network("refused".into()).is_offline());
    }
}
