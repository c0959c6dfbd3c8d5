//! Property-based test generators using proptest.
//!
//! Provides strategies for generating section data that maintains the
//! model's invariants (non-empty references, unique ids per collection).

use coursesync_model::{LessonId, MediaId, QuizId, Section, SectionBody, SectionId};
use proptest::prelude::*;

/// Strategy for generating valid section bodies across all kinds.
pub fn body_strategy() -> impl Strategy<Value = SectionBody> {
    prop_oneof![
        prop::string::string_regex("[a-z ]{0,24}")
            .expect("Invalid regex")
            .prop_map(|content| SectionBody::Text { content }),
        (
            prop::string::string_regex("m-[a-z0-9]{4}").expect("Invalid regex"),
            prop::option::of(prop::string::string_regex("[a-z ]{1,12}").expect("Invalid regex")),
        )
            .prop_map(|(media, caption)| SectionBody::Media {
                media: MediaId::new(media),
                caption,
            }),
        prop::string::string_regex("q-[a-z0-9]{4}")
            .expect("Invalid regex")
            .prop_map(|quiz| SectionBody::Quiz {
                quiz: QuizId::new(quiz)
            }),
    ]
}

/// Strategy for generating section positions.
///
/// Positions are comparable but not contiguous, like real lesson data.
pub fn position_strategy() -> impl Strategy<Value = u32> {
    0u32..1000
}

/// Strategy for a collection of persisted sections with unique ids.
pub fn persisted_sections_strategy(
    lesson: &LessonId,
    max: usize,
) -> impl Strategy<Value = Vec<Section>> {
    let lesson = lesson.clone();
    prop::collection::vec((body_strategy(), position_strategy()), 0..=max).prop_map(
        move |items| {
            items
                .into_iter()
                .enumerate()
                .map(|(index, (body, position))| {
                    Section::new(
                        SectionId::persisted(format!("s{index}")),
                        lesson.clone(),
                        body,
                        position,
                    )
                })
                .collect()
        },
    )
}
