//! Section records and their content variants.

use crate::error::ValidationError;
use crate::ids::{LessonId, MediaId, QuizId, SectionId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The content shape of a section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionKind {
    /// Free-form text content.
    Text,
    /// Reference to an uploaded media asset.
    Media,
    /// Reference to a quiz.
    Quiz,
}

impl fmt::Display for SectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SectionKind::Text => write!(f, "text"),
            SectionKind::Media => write!(f, "media"),
            SectionKind::Quiz => write!(f, "quiz"),
        }
    }
}

/// Variant-specific content of a section.
///
/// One variant per [`SectionKind`], so a record can only carry the fields
/// relevant to its kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum SectionBody {
    /// Free-form text content.
    Text {
        /// The rendered text.
        content: String,
    },
    /// Reference to an uploaded media asset, with an optional caption.
    Media {
        /// The referenced media asset.
        media: MediaId,
        /// Caption shown alongside the asset.
        #[serde(skip_serializing_if = "Option::is_none")]
        caption: Option<String>,
    },
    /// Reference to a quiz.
    Quiz {
        /// The referenced quiz.
        quiz: QuizId,
    },
}

impl SectionBody {
    /// Returns the content kind of this body.
    #[must_use]
    pub fn kind(&self) -> SectionKind {
        match self {
            SectionBody::Text { .. } => SectionKind::Text,
            SectionBody::Media { .. } => SectionKind::Media,
            SectionBody::Quiz { .. } => SectionKind::Quiz,
        }
    }
}

/// A single content section within a lesson.
///
/// `position` orders sections within their lesson. Values are comparable
/// but not required to be contiguous; reconciliation detects position
/// changes without renumbering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    /// Section identifier, provisional or persisted.
    pub id: SectionId,
    /// The lesson this section belongs to.
    pub lesson: LessonId,
    /// Variant-specific content.
    #[serde(flatten)]
    pub body: SectionBody,
    /// Position within the lesson.
    pub position: u32,
}

impl Section {
    /// Creates a new section record.
    pub fn new(id: SectionId, lesson: LessonId, body: SectionBody, position: u32) -> Self {
        Self {
            id,
            lesson,
            body,
            position,
        }
    }

    /// Returns the content kind of this section.
    #[must_use]
    pub fn kind(&self) -> SectionKind {
        self.body.kind()
    }

    /// Checks that this record can be accepted by a store.
    ///
    /// Referenced asset ids must be non-empty, and the section id itself
    /// must carry a non-empty token or id.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.id.as_str().is_empty() {
            return Err(ValidationError::EmptyId);
        }
        match &self.body {
            SectionBody::Text { .. } => Ok(()),
            SectionBody::Media { media, .. } => {
                if media.as_str().is_empty() {
                    Err(ValidationError::MissingReference {
                        id: self.id.as_str().to_string(),
                        kind: SectionKind::Media.to_string(),
                    })
                } else {
                    Ok(())
                }
            }
            SectionBody::Quiz { quiz } => {
                if quiz.as_str().is_empty() {
                    Err(ValidationError::MissingReference {
                        id: self.id.as_str().to_string(),
                        kind: SectionKind::Quiz.to_string(),
                    })
                } else {
                    Ok(())
                }
            }
        }
    }

    /// Returns true if `other` carries the same content and position.
    ///
    /// Identifier and lesson are not compared; this is the field-by-field
    /// check reconciliation uses to decide whether an update is needed.
    #[must_use]
    pub fn content_eq(&self, other: &Section) -> bool {
        self.body == other.body && self.position == other.position
    }
}

/// Stable sort of a collection by position.
///
/// Ties keep their input order, matching how the store reports collections.
pub fn sort_by_position(sections: &mut [Section]) {
    sections.sort_by_key(|section| section.position);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(id: SectionId, position: u32) -> Section {
        Section::new(
            id,
            LessonId::new("lesson-1"),
            SectionBody::Text {
                content: "hello".into(),
            },
            position,
        )
    }

    #[test]
    fn body_kind_mapping() {
        assert_eq!(
            SectionBody::Text {
                content: String::new()
            }
            .kind(),
            SectionKind::Text
        );
        assert_eq!(
            SectionBody::Media {
                media: MediaId::new("m1"),
                caption: None
            }
            .kind(),
            SectionKind::Media
        );
        assert_eq!(
            SectionBody::Quiz {
                quiz: QuizId::new("q1")
            }
            .kind(),
            SectionKind::Quiz
        );
    }

    #[test]
    fn validate_missing_media_reference() {
        let section = Section::new(
            SectionId::persisted("s1"),
            LessonId::new("lesson-1"),
            SectionBody::Media {
                media: MediaId::new(""),
                caption: Some("caption".into()),
            },
            0,
        );
        assert!(matches!(
            section.validate(),
            Err(ValidationError::MissingReference { .. })
        ));
    }

    #[test]
    fn validate_missing_quiz_reference() {
        let section = Section::new(
            SectionId::new_provisional(),
            LessonId::new("lesson-1"),
            SectionBody::Quiz {
                quiz: QuizId::new(""),
            },
            0,
        );
        assert!(matches!(
            section.validate(),
            Err(ValidationError::MissingReference { .. })
        ));
    }

    #[test]
    fn validate_empty_id() {
        let section = text(SectionId::persisted(""), 0);
        assert_eq!(section.validate(), Err(ValidationError::EmptyId));
    }

    #[test]
    fn content_eq_ignores_identity() {
        let a = text(SectionId::persisted("s1"), 3);
        let mut b = text(SectionId::new_provisional(), 3);
        assert!(a.content_eq(&b));

        b.position = 4;
        assert!(!a.content_eq(&b));
    }

    #[test]
    fn sort_is_stable_on_ties() {
        let mut sections = vec![
            text(SectionId::persisted("b"), 5),
            text(SectionId::persisted("a"), 1),
            text(SectionId::persisted("c"), 5),
        ];
        sort_by_position(&mut sections);
        let order: Vec<&str> = sections.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(order, vec!["a", "b", "c"]);
    }

    #[test]
    fn section_serializes_with_tagged_body() {
        let section = Section::new(
            SectionId::persisted("s1"),
            LessonId::new("lesson-1"),
            SectionBody::Media {
                media: MediaId::new("m-9"),
                caption: None,
            },
            2,
        );
        let value = serde_json::to_value(&section).unwrap();
        assert_eq!(value["kind"], "media");
        assert_eq!(value["media"], "m-9");
        assert_eq!(value["id"]["state"], "persisted");
        assert_eq!(value["position"], 2);
    }
}
