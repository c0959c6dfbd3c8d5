//! Error types for the sync engine.

use coursesync_model::ValidationError;
use coursesync_store::StoreError;
use std::fmt;
use thiserror::Error;

/// Result type for sync operations.
pub type SyncResult<T> = Result<T, SyncError>;

/// The kind of remote mutation that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationKind {
    /// A create call.
    Create,
    /// An update call.
    Update,
    /// A delete call.
    Delete,
}

impl fmt::Display for MutationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MutationKind::Create => write!(f, "create"),
            MutationKind::Update => write!(f, "update"),
            MutationKind::Delete => write!(f, "delete"),
        }
    }
}

/// A single store mutation that failed during a sync pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationFailure {
    /// Which mutation failed.
    pub kind: MutationKind,
    /// The section id (or provisional token) the mutation targeted.
    pub id: String,
    /// The underlying store error.
    pub error: StoreError,
}

impl fmt::Display for OperationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} of {}: {}", self.kind, self.id, self.error)
    }
}

/// Errors that can occur during sync operations.
#[derive(Error, Debug)]
pub enum SyncError {
    /// A desired section cannot be accepted by any store.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// The baseline snapshot contained a section that was never persisted.
    #[error("baseline contains provisional section {token}")]
    ProvisionalBaseline {
        /// The provisional token found in the baseline.
        token: String,
    },

    /// A desired section carries a persisted id the baseline never knew
    /// about (see [`crate::StalePolicy`]).
    #[error("stale baseline: unknown persisted section {id}")]
    StaleBaseline {
        /// The unknown persisted id.
        id: String,
    },

    /// One or more store mutations failed.
    ///
    /// Operations that succeeded before or alongside the failures are not
    /// rolled back; the caller should treat the desired collection as not
    /// confirmed persisted and may re-attempt the sync.
    #[error("sync failed: {} operation(s) failed", failures.len())]
    SyncFailed {
        /// Every mutation that failed, with operation kind and target id.
        failures: Vec<OperationFailure>,
    },

    /// All mutations succeeded but the post-sync fetch failed.
    #[error("refresh failed: {0}")]
    Refresh(#[source] StoreError),

    /// Sync was cancelled between phases.
    #[error("sync cancelled")]
    Cancelled,

    /// Invalid state transition.
    #[error("invalid state transition from {from} to {to}")]
    InvalidStateTransition {
        /// Current state.
        from: String,
        /// Attempted target state.
        to: String,
    },
}
