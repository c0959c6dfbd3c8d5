//! # Coursesync Store
//!
//! Store client abstraction for coursesync.
//!
//! This crate provides:
//! - `SectionStore`, the async CRUD trait the reconciler calls
//! - `StoreError` with retryable-transport classification
//! - `MemoryStore`, an in-memory reference implementation with a call
//!   journal and fault injection for tests
//!
//! The trait abstracts the remote backend (HTTP API, database, test
//! double); timeout and transport policy belong to implementations.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod client;
mod error;
mod memory;

pub use client::SectionStore;
pub use error::{StoreError, StoreResult};
pub use memory::{MemoryStore, StoreCall};
