//! # Coursesync Engine
//!
//! Collection reconciler for lesson sections.
//!
//! This crate provides:
//! - Diff planning between an edited collection and its persisted baseline
//! - A sync engine applying the minimal create/update/delete set
//! - Sync state machine (idle → planning → deleting → upserting →
//!   refreshing → synced)
//! - Per-engine statistics and cooperative cancellation
//!
//! ## Architecture
//!
//! A sync pass is **plan-then-apply**:
//! 1. Diff the desired collection against the baseline (pure, no I/O)
//! 2. Issue deletions concurrently and let them settle
//! 3. Issue creates and updates sequentially in desired order
//! 4. Re-fetch the authoritative collection and return it sorted
//!
//! ## Key Invariants
//!
//! - A provisional section is only ever the target of a create call
//! - Deletions settle before any create or update is issued
//! - Unchanged sections cost no store call
//! - Every independent mutation is attempted; failures are collected and
//!   reported together, never rolled back
//! - The engine never retries; retry decisions belong to the caller

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod error;
mod plan;
mod state;

pub use config::{StalePolicy, SyncConfig};
pub use error::{MutationKind, OperationFailure, SyncError, SyncResult};
pub use plan::{Mutation, SyncPlan};
pub use state::{SyncEngine, SyncState, SyncStats};
