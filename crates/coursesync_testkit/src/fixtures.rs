//! Section fixtures for tests.

use coursesync_model::{LessonId, MediaId, QuizId, Section, SectionBody, SectionId};

/// Shorthand for a persisted section id.
pub fn persisted(id: &str) -> SectionId {
    SectionId::persisted(id)
}

/// Shorthand for a provisional section id.
pub fn provisional(token: &str) -> SectionId {
    SectionId::provisional(token)
}

/// A text section.
pub fn text_section(id: SectionId, lesson: &LessonId, content: &str, position: u32) -> Section {
    Section::new(
        id,
        lesson.clone(),
        SectionBody::Text {
            content: content.into(),
        },
        position,
    )
}

/// A media-reference section without caption.
pub fn media_section(id: SectionId, lesson: &LessonId, media: &str, position: u32) -> Section {
    Section::new(
        id,
        lesson.clone(),
        SectionBody::Media {
            media: MediaId::new(media),
            caption: None,
        },
        position,
    )
}

/// A quiz-reference section.
pub fn quiz_section(id: SectionId, lesson: &LessonId, quiz: &str, position: u32) -> Section {
    Section::new(
        id,
        lesson.clone(),
        SectionBody::Quiz {
            quiz: QuizId::new(quiz),
        },
        position,
    )
}
