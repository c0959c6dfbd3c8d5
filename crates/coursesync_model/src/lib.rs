//! # Coursesync Model
//!
//! Lesson section entity model for coursesync.
//!
//! This crate provides:
//! - `SectionId` distinguishing provisional from persisted identifiers
//! - `LessonId`, `MediaId`, `QuizId` typed identifiers
//! - `Section` records with a `SectionBody` tagged union per content kind
//! - Validation of records before they are sent to a store
//!
//! This is a pure data crate with no I/O operations.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod error;
mod ids;
mod section;

pub use error::ValidationError;
pub use ids::{LessonId, MediaId, QuizId, SectionId};
pub use section::{sort_by_position, Section, SectionBody, SectionKind};
