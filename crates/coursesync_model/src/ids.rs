//! Identifier types for lessons and their content.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Identifier for a lesson, the collection that owns a set of sections.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LessonId(String);

impl LessonId {
    /// Creates a lesson ID from a store-assigned identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the raw identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LessonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier for an uploaded media asset referenced by a section.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MediaId(String);

impl MediaId {
    /// Creates a media ID from a store-assigned identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the raw identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MediaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier for a quiz referenced by a section.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuizId(String);

impl QuizId {
    /// Creates a quiz ID from a store-assigned identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the raw identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for QuizId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier for a section.
///
/// A section id takes one of two forms:
/// - `Provisional`: a locally generated token for a section that has never
///   been persisted. It has no remote counterpart and must never be the
///   target of an update or delete call.
/// - `Persisted`: the opaque identifier assigned by the remote store.
///
/// The two cases are separate variants so that dispatching create vs.
/// update is checked exhaustively by the compiler instead of by runtime
/// string inspection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "state", content = "id")]
pub enum SectionId {
    /// Locally generated token; the section has never round-tripped.
    Provisional(String),
    /// Opaque identifier assigned by the remote store.
    Persisted(String),
}

impl SectionId {
    /// Generates a fresh provisional identifier.
    #[must_use]
    pub fn new_provisional() -> Self {
        Self::Provisional(format!("local-{}", Uuid::new_v4()))
    }

    /// Creates a provisional identifier from an existing local token.
    pub fn provisional(token: impl Into<String>) -> Self {
        Self::Provisional(token.into())
    }

    /// Creates a persisted identifier from a store-assigned id.
    pub fn persisted(id: impl Into<String>) -> Self {
        Self::Persisted(id.into())
    }

    /// Returns true if this section has never been persisted.
    #[must_use]
    pub fn is_provisional(&self) -> bool {
        matches!(self, Self::Provisional(_))
    }

    /// Returns the persisted id, or `None` for a provisional section.
    #[must_use]
    pub fn as_persisted(&self) -> Option<&str> {
        match self {
            Self::Provisional(_) => None,
            Self::Persisted(id) => Some(id),
        }
    }

    /// Returns the raw token or id, regardless of form.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Provisional(token) => token,
            Self::Persisted(id) => id,
        }
    }
}

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Provisional(token) => write!(f, "local:{token}"),
            Self::Persisted(id) => write!(f, "{id}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provisional_ids_are_unique() {
        let a = SectionId::new_provisional();
        let b = SectionId::new_provisional();
        assert_ne!(a, b);
        assert!(a.is_provisional());
        assert!(a.as_persisted().is_none());
    }

    #[test]
    fn persisted_id_access() {
        let id = SectionId::persisted("sec-42");
        assert!(!id.is_provisional());
        assert_eq!(id.as_persisted(), Some("sec-42"));
        assert_eq!(id.as_str(), "sec-42");
        assert_eq!(format!("{id}"), "sec-42");
    }

    #[test]
    fn provisional_display_is_marked() {
        let id = SectionId::provisional("tmp-1");
        assert_eq!(format!("{id}"), "local:tmp-1");
        assert_eq!(id.as_str(), "tmp-1");
    }

    #[test]
    fn lesson_id_display() {
        let lesson = LessonId::new("lesson-7");
        assert_eq!(lesson.as_str(), "lesson-7");
        assert_eq!(format!("{lesson}"), "lesson-7");
    }
}
