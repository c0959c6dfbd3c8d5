//! The store client trait the reconciler calls.

use crate::error::StoreResult;
use async_trait::async_trait;
use coursesync_model::{LessonId, Section};

/// Remote persistence operations for lesson sections.
///
/// Implementations wrap a concrete backend. `update` and `delete` take
/// persisted identifiers only; the reconciler extracts them via
/// [`coursesync_model::SectionId::as_persisted`], so a provisional section
/// can never reach either call.
///
/// Timeout and transport policy belong to the implementation, not to
/// callers of this trait.
#[async_trait]
pub trait SectionStore: Send + Sync {
    /// Persists a new section under `lesson` and returns it with a
    /// store-assigned persisted id.
    async fn create(&self, lesson: &LessonId, section: &Section) -> StoreResult<Section>;

    /// Overwrites the stored section under `id` with the given content and
    /// returns the stored form.
    async fn update(&self, id: &str, section: &Section) -> StoreResult<Section>;

    /// Removes the section under `id`.
    ///
    /// Implementations are encouraged to treat deleting an id that is
    /// already absent as a no-op.
    async fn delete(&self, id: &str) -> StoreResult<()>;

    /// Returns the authoritative collection for `lesson`, in store order.
    async fn list_by_lesson(&self, lesson: &LessonId) -> StoreResult<Vec<Section>>;
}
