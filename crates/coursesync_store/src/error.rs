//! Error types for store clients.

use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors raised by a store client.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Network or transport error.
    #[error("transport error: {message}")]
    Transport {
        /// Error message.
        message: String,
        /// Whether the operation can be retried.
        retryable: bool,
    },

    /// No section exists under the given persisted id.
    #[error("section {id} not found")]
    NotFound {
        /// The persisted id that was targeted.
        id: String,
    },

    /// The store rejected the request (validation, authorization, conflict).
    #[error("store rejected request: {0}")]
    Rejected(String),

    /// The store is temporarily unavailable.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    /// Creates a retryable transport error.
    pub fn transport_retryable(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
            retryable: true,
        }
    }

    /// Creates a non-retryable transport error.
    pub fn transport_fatal(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
            retryable: false,
        }
    }

    /// Returns true if retrying the same call may succeed.
    ///
    /// The reconciler never retries; this classification is for callers
    /// deciding whether to re-attempt a full sync.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            StoreError::Transport { retryable, .. } => *retryable,
            StoreError::Unavailable(_) => true,
            StoreError::NotFound { .. } | StoreError::Rejected(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retryable_classification() {
        assert!(StoreError::transport_retryable("connection reset").is_retryable());
        assert!(!StoreError::transport_fatal("invalid certificate").is_retryable());
        assert!(StoreError::Unavailable("maintenance".into()).is_retryable());
        assert!(!StoreError::NotFound { id: "s1".into() }.is_retryable());
        assert!(!StoreError::Rejected("bad payload".into()).is_retryable());
    }

    #[test]
    fn error_display() {
        let err = StoreError::NotFound { id: "s1".into() };
        assert_eq!(err.to_string(), "section s1 not found");
    }
}
