//! Oracle error types
//!
//! These never leave the crate through [`crate::IdentityOracleAdapter::is_identity_linked`];
//! they exist so the contained failure can be logged and inspected.

use thiserror::Error;

/// Identity oracle failures
#[derive(Debug, Error)]
pub enum OracleError {
    /// No registry is configured for this token
    #[error("Identity registry unavailable")]
    RegistryUnavailable,

    /// The registry rejected the query
    #[error("Identity registry call reverted: {reason}")]
    Reverted { reason: String },

    /// The registry answered with something that is not a 32-byte identity word
    #[error("Malformed identity response: expected {expected} bytes, got {actual}")]
    MalformedResponse { expected: usize, actual: usize },

    /// The registry did not answer within the configured timeout
    #[error("Identity registry timed out after {0}ms")]
    Timeout(u64),

    /// The runtime has no time driver, so the call cannot be bounded
    #[error("Identity lookup needs a runtime with timers enabled")]
    TimerUnavailable,

    /// The registry task panicked or was cancelled
    #[error("Identity registry task aborted: {0}")]
    Aborted(String),

    /// Transport-level failure reaching the registry
    #[error("Identity registry connection failed: {source}")]
    ConnectionFailed {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl OracleError {
    /// Create a revert error
    pub fn reverted(reason: impl Into<String>) -> Self {
        OracleError::Reverted {
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reverted_message() {
        let err = OracleError::reverted("paused");
        assert!(err.to_string().contains("paused"));
    }

    #[test]
    fn test_timeout_message() {
        let err = OracleError::Timeout(500);
        assert!(err.to_string().contains("500ms"));
    }
}
