//! Validation errors for section records.

use thiserror::Error;

/// Errors for a section record that no store can accept.
///
/// Surfaced before any remote call is attempted for the offending record.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A section carries an empty identifier.
    #[error("section has an empty identifier")]
    EmptyId,

    /// A reference-kind section is missing its referenced asset id.
    #[error("{kind} section {id} is missing its reference")]
    MissingReference {
        /// Section id or provisional token.
        id: String,
        /// The content kind whose reference is empty.
        kind: String,
    },

    /// The same id appears more than once within one collection.
    #[error("duplicate section id {id} in collection")]
    DuplicateId {
        /// The repeated id.
        id: String,
    },

    /// A section belongs to a different lesson than the one being synced.
    #[error("section {id} belongs to lesson {found}, expected {expected}")]
    LessonMismatch {
        /// Section id or provisional token.
        id: String,
        /// The lesson being synced.
        expected: String,
        /// The lesson the section actually references.
        found: String,
    },
}
