//! In-memory reference store.

use crate::client::SectionStore;
use crate::error::{StoreError, StoreResult};
use async_trait::async_trait;
use coursesync_model::{LessonId, Section, SectionId};
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

/// A store call as observed by [`MemoryStore`].
///
/// Tests assert against the journal to check exactly which mutations a
/// sync pass issued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCall {
    /// A create call; `id` is the incoming section's token or id.
    Create {
        /// Target lesson.
        lesson: String,
        /// Incoming section id (usually a provisional token).
        id: String,
    },
    /// An update call against a persisted id.
    Update {
        /// Target persisted id.
        id: String,
    },
    /// A delete call against a persisted id.
    Delete {
        /// Target persisted id.
        id: String,
    },
    /// A listing of one lesson's collection.
    List {
        /// Target lesson.
        lesson: String,
    },
}

/// An in-memory section store for tests and local development.
///
/// Persisted ids are assigned sequentially (`sec-1`, `sec-2`, ...) so
/// tests stay deterministic. Every call is journaled, and individual
/// operations can be armed to fail once.
#[derive(Default)]
pub struct MemoryStore {
    lessons: RwLock<HashMap<String, Vec<Section>>>,
    calls: RwLock<Vec<StoreCall>>,
    next_id: AtomicU64,
    fail_create: Mutex<Option<StoreError>>,
    fail_update: Mutex<HashMap<String, StoreError>>,
    fail_delete: Mutex<HashMap<String, StoreError>>,
    fail_list: Mutex<Option<StoreError>>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs a collection without recording calls or assigning ids.
    ///
    /// Sections are stored as given; seed persisted sections when
    /// simulating a previously synced lesson.
    pub fn seed(&self, lesson: &LessonId, sections: Vec<Section>) {
        self.lessons
            .write()
            .insert(lesson.as_str().to_string(), sections);
    }

    /// Returns the journal of calls made so far.
    #[must_use]
    pub fn calls(&self) -> Vec<StoreCall> {
        self.calls.read().clone()
    }

    /// Clears the call journal.
    pub fn clear_calls(&self) {
        self.calls.write().clear();
    }

    /// Returns the total number of stored sections across lessons.
    #[must_use]
    pub fn section_count(&self) -> usize {
        self.lessons.read().values().map(Vec::len).sum()
    }

    /// Returns true if a section with the given persisted id is stored.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.lessons
            .read()
            .values()
            .any(|sections| sections.iter().any(|s| s.id.as_persisted() == Some(id)))
    }

    /// Arms the next create call to fail with `error`.
    pub fn fail_next_create(&self, error: StoreError) {
        *self.fail_create.lock() = Some(error);
    }

    /// Arms the next update of `id` to fail with `error`.
    pub fn fail_update_of(&self, id: impl Into<String>, error: StoreError) {
        self.fail_update.lock().insert(id.into(), error);
    }

    /// Arms the next delete of `id` to fail with `error`.
    pub fn fail_delete_of(&self, id: impl Into<String>, error: StoreError) {
        self.fail_delete.lock().insert(id.into(), error);
    }

    /// Arms the next list call to fail with `error`.
    pub fn fail_next_list(&self, error: StoreError) {
        *self.fail_list.lock() = Some(error);
    }

    fn record(&self, call: StoreCall) {
        self.calls.write().push(call);
    }

    fn assign_id(&self) -> SectionId {
        let n = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        SectionId::persisted(format!("sec-{n}"))
    }
}

#[async_trait]
impl SectionStore for MemoryStore {
    async fn create(&self, lesson: &LessonId, section: &Section) -> StoreResult<Section> {
        self.record(StoreCall::Create {
            lesson: lesson.as_str().to_string(),
            id: section.id.as_str().to_string(),
        });

        if let Some(error) = self.fail_create.lock().take() {
            return Err(error);
        }
        section
            .validate()
            .map_err(|e| StoreError::Rejected(e.to_string()))?;

        let stored = Section::new(
            self.assign_id(),
            lesson.clone(),
            section.body.clone(),
            section.position,
        );
        self.lessons
            .write()
            .entry(lesson.as_str().to_string())
            .or_default()
            .push(stored.clone());
        Ok(stored)
    }

    async fn update(&self, id: &str, section: &Section) -> StoreResult<Section> {
        self.record(StoreCall::Update { id: id.to_string() });

        if let Some(error) = self.fail_update.lock().remove(id) {
            return Err(error);
        }
        section
            .validate()
            .map_err(|e| StoreError::Rejected(e.to_string()))?;

        let mut lessons = self.lessons.write();
        for sections in lessons.values_mut() {
            if let Some(stored) = sections
                .iter_mut()
                .find(|s| s.id.as_persisted() == Some(id))
            {
                stored.body = section.body.clone();
                stored.position = section.position;
                return Ok(stored.clone());
            }
        }
        Err(StoreError::NotFound { id: id.to_string() })
    }

    async fn delete(&self, id: &str) -> StoreResult<()> {
        self.record(StoreCall::Delete { id: id.to_string() });

        if let Some(error) = self.fail_delete.lock().remove(id) {
            return Err(error);
        }

        // Absent ids are a no-op.
        let mut lessons = self.lessons.write();
        for sections in lessons.values_mut() {
            sections.retain(|s| s.id.as_persisted() != Some(id));
        }
        Ok(())
    }

    async fn list_by_lesson(&self, lesson: &LessonId) -> StoreResult<Vec<Section>> {
        self.record(StoreCall::List {
            lesson: lesson.as_str().to_string(),
        });

        if let Some(error) = self.fail_list.lock().take() {
            return Err(error);
        }

        Ok(self
            .lessons
            .read()
            .get(lesson.as_str())
            .cloned()
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use coursesync_model::SectionBody;

    fn lesson() -> LessonId {
        LessonId::new("lesson-1")
    }

    fn draft(content: &str, position: u32) -> Section {
        Section::new(
            SectionId::new_provisional(),
            lesson(),
            SectionBody::Text {
                content: content.into(),
            },
            position,
        )
    }

    #[tokio::test]
    async fn create_assigns_sequential_ids() {
        let store = MemoryStore::new();

        let a = store.create(&lesson(), &draft("a", 0)).await.unwrap();
        let b = store.create(&lesson(), &draft("b", 1)).await.unwrap();

        assert_eq!(a.id.as_persisted(), Some("sec-1"));
        assert_eq!(b.id.as_persisted(), Some("sec-2"));
        assert_eq!(store.section_count(), 2);
    }

    #[tokio::test]
    async fn update_unknown_id_is_not_found() {
        let store = MemoryStore::new();

        let result = store.update("sec-404", &draft("x", 0)).await;
        assert_eq!(
            result,
            Err(StoreError::NotFound {
                id: "sec-404".into()
            })
        );
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let store = MemoryStore::new();
        let stored = store.create(&lesson(), &draft("a", 0)).await.unwrap();
        let id = stored.id.as_persisted().unwrap();

        store.delete(id).await.unwrap();
        store.delete(id).await.unwrap();
        assert!(!store.contains(id));
    }

    #[tokio::test]
    async fn armed_failures_fire_once() {
        let store = MemoryStore::new();
        store.fail_next_create(StoreError::transport_retryable("reset"));

        assert!(store.create(&lesson(), &draft("a", 0)).await.is_err());
        assert!(store.create(&lesson(), &draft("a", 0)).await.is_ok());
    }

    #[tokio::test]
    async fn journal_records_mutations() {
        let store = MemoryStore::new();
        let stored = store.create(&lesson(), &draft("a", 0)).await.unwrap();
        let id = stored.id.as_persisted().unwrap().to_string();

        store.update(&id, &stored).await.unwrap();
        store.delete(&id).await.unwrap();
        store.list_by_lesson(&lesson()).await.unwrap();

        let calls = store.calls();
        assert_eq!(calls.len(), 4);
        assert!(matches!(calls[0], StoreCall::Create { .. }));
        assert_eq!(calls[1], StoreCall::Update { id: id.clone() });
        assert_eq!(calls[2], StoreCall::Delete { id });
        assert_eq!(
            calls[3],
            StoreCall::List {
                lesson: "lesson-1".into()
            }
        );
    }

    #[tokio::test]
    async fn seed_then_list() {
        let store = MemoryStore::new();
        let seeded = vec![Section::new(
            SectionId::persisted("s1"),
            lesson(),
            SectionBody::Text { content: "a".into() },
            0,
        )];
        store.seed(&lesson(), seeded.clone());

        let listed = store.list_by_lesson(&lesson()).await.unwrap();
        assert_eq!(listed, seeded);
    }

    #[tokio::test]
    async fn create_rejects_invalid_payload() {
        let store = MemoryStore::new();
        let section = Section::new(
            SectionId::new_provisional(),
            lesson(),
            SectionBody::Quiz {
                quiz: coursesync_model::QuizId::new(""),
            },
            0,
        );

        let result = store.create(&lesson(), &section).await;
        assert!(matches!(result, Err(StoreError::Rejected(_))));
    }
}
