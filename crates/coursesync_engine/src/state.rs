//! Sync engine state machine.

use crate::config::SyncConfig;
use crate::error::{MutationKind, OperationFailure, SyncError, SyncResult};
use crate::plan::{Mutation, SyncPlan};
use coursesync_model::{sort_by_position, LessonId, Section};
use coursesync_store::SectionStore;
use futures::stream::{self, StreamExt};
use parking_lot::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

/// The current state of the sync engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    /// Engine is idle, not syncing.
    Idle,
    /// Engine is diffing the desired collection against the baseline.
    Planning,
    /// Engine is issuing delete calls.
    Deleting,
    /// Engine is issuing create and update calls.
    Upserting,
    /// Engine is re-fetching the authoritative collection.
    Refreshing,
    /// Engine has completed a sync pass.
    Synced,
    /// Engine encountered an error.
    Error,
}

impl SyncState {
    /// Returns true if the engine is in an active sync state.
    pub fn is_active(&self) -> bool {
        matches!(
            self,
            SyncState::Planning
                | SyncState::Deleting
                | SyncState::Upserting
                | SyncState::Refreshing
        )
    }

    /// Returns true if the engine can start a new sync.
    pub fn can_start_sync(&self) -> bool {
        matches!(self, SyncState::Idle | SyncState::Synced | SyncState::Error)
    }
}

impl std::fmt::Display for SyncState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}

/// Statistics about sync operations.
#[derive(Debug, Clone, Default)]
pub struct SyncStats {
    /// Total number of sync passes completed.
    pub cycles_completed: u64,
    /// Total number of sections created.
    pub sections_created: u64,
    /// Total number of sections updated.
    pub sections_updated: u64,
    /// Total number of sections deleted.
    pub sections_deleted: u64,
    /// Total number of sections skipped as unchanged.
    pub sections_unchanged: u64,
    /// Last sync time.
    pub last_sync_time: Option<Instant>,
    /// Last error message.
    pub last_error: Option<String>,
}

/// The sync engine reconciles one lesson's section collection against a
/// remote store.
///
/// Given the locally edited collection and the last persisted snapshot, a
/// sync pass plans the minimal mutations, applies them (deletes first,
/// then creates/updates in desired order), and returns the refreshed
/// authoritative collection. The store is constructor-injected; the
/// engine holds no global client.
pub struct SyncEngine<S: SectionStore> {
    config: SyncConfig,
    store: Arc<S>,
    state: RwLock<SyncState>,
    stats: RwLock<SyncStats>,
    cancelled: AtomicBool,
}

impl<S: SectionStore> SyncEngine<S> {
    /// Creates a new sync engine.
    pub fn new(config: SyncConfig, store: S) -> Self {
        Self {
            config,
            store: Arc::new(store),
            state: RwLock::new(SyncState::Idle),
            stats: RwLock::new(SyncStats::default()),
            cancelled: AtomicBool::new(false),
        }
    }

    /// Gets the underlying store.
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Gets the current state.
    pub fn state(&self) -> SyncState {
        *self.state.read()
    }

    /// Gets the current stats.
    pub fn stats(&self) -> SyncStats {
        self.stats.read().clone()
    }

    /// Cancels an ongoing sync at the next phase boundary.
    ///
    /// Store calls already dispatched run to completion, so the remote
    /// collection is never left with an unrecorded half-applied batch.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Resets the cancelled flag.
    pub fn reset_cancel(&self) {
        self.cancelled.store(false, Ordering::SeqCst);
    }

    fn check_cancelled(&self) -> SyncResult<()> {
        if self.cancelled.load(Ordering::SeqCst) {
            Err(SyncError::Cancelled)
        } else {
            Ok(())
        }
    }

    fn set_state(&self, state: SyncState) {
        *self.state.write() = state;
    }

    fn handle_error(&self, error: &SyncError) {
        self.set_state(SyncState::Error);
        self.stats.write().last_error = Some(error.to_string());
    }

    /// Performs a full sync pass for one lesson.
    ///
    /// `desired` is the locally edited collection (any mix of provisional
    /// and persisted sections, in any order); `baseline` is the snapshot
    /// last fetched from the store. On success the returned collection is
    /// the store's authoritative state, every id persisted, sorted by
    /// position - callers should adopt it as the next baseline.
    ///
    /// Failure policy is continue-and-collect: every independent mutation
    /// is attempted, and failures are reported together as
    /// [`SyncError::SyncFailed`]. Nothing is rolled back.
    pub async fn sync(
        &self,
        lesson: &LessonId,
        desired: &[Section],
        baseline: &[Section],
    ) -> SyncResult<Vec<Section>> {
        self.reset_cancel();

        if !self.state().can_start_sync() {
            return Err(SyncError::InvalidStateTransition {
                from: self.state().to_string(),
                to: "sync".into(),
            });
        }

        self.set_state(SyncState::Planning);
        let plan = match SyncPlan::build(lesson, desired, baseline, self.config.stale_policy) {
            Ok(plan) => plan,
            Err(e) => {
                self.handle_error(&e);
                return Err(e);
            }
        };
        debug!(
            lesson = %lesson,
            deletes = plan.deletes.len(),
            creates = plan.creates().count(),
            updates = plan.updates().count(),
            unchanged = plan.unchanged,
            "sync plan built"
        );

        if let Err(e) = self.check_cancelled() {
            self.handle_error(&e);
            return Err(e);
        }

        // Deletions settle before any create is issued, so a store that
        // recycles ids cannot hand a fresh section a just-freed id.
        self.set_state(SyncState::Deleting);
        let mut failures = self.run_deletes(&plan).await;

        if self.cancelled.load(Ordering::SeqCst) {
            // A cancel that raced with failing deletes still reports the
            // failures; they are the more actionable signal.
            let error = if failures.is_empty() {
                SyncError::Cancelled
            } else {
                SyncError::SyncFailed { failures }
            };
            self.handle_error(&error);
            return Err(error);
        }

        self.set_state(SyncState::Upserting);
        failures.extend(self.run_upserts(&plan).await);

        if !failures.is_empty() {
            for failure in &failures {
                warn!(%failure, "store mutation failed");
            }
            let error = SyncError::SyncFailed { failures };
            self.handle_error(&error);
            return Err(error);
        }

        if let Err(e) = self.check_cancelled() {
            self.handle_error(&e);
            return Err(e);
        }

        self.set_state(SyncState::Refreshing);
        let mut refreshed = match self.store.list_by_lesson(lesson).await {
            Ok(sections) => sections,
            Err(store_error) => {
                let error = SyncError::Refresh(store_error);
                self.handle_error(&error);
                return Err(error);
            }
        };
        sort_by_position(&mut refreshed);

        self.set_state(SyncState::Synced);
        {
            let mut stats = self.stats.write();
            stats.cycles_completed += 1;
            stats.sections_created += plan.creates().count() as u64;
            stats.sections_updated += plan.updates().count() as u64;
            stats.sections_deleted += plan.deletes.len() as u64;
            stats.sections_unchanged += plan.unchanged as u64;
            stats.last_sync_time = Some(Instant::now());
            stats.last_error = None;
        }
        debug!(lesson = %lesson, total = refreshed.len(), "sync complete");

        Ok(refreshed)
    }

    /// Issues all planned deletes concurrently and collects failures.
    async fn run_deletes(&self, plan: &SyncPlan) -> Vec<OperationFailure> {
        if plan.deletes.is_empty() {
            return Vec::new();
        }

        let targets = plan
            .deletes
            .iter()
            .filter_map(|section| section.id.as_persisted());

        let results: Vec<Option<OperationFailure>> = stream::iter(targets)
            .map(|id| async move {
                match self.store.delete(id).await {
                    Ok(()) => None,
                    Err(error) => Some(OperationFailure {
                        kind: MutationKind::Delete,
                        id: id.to_string(),
                        error,
                    }),
                }
            })
            .buffer_unordered(self.config.delete_concurrency.max(1))
            .collect()
            .await;

        results.into_iter().flatten().collect()
    }

    /// Issues creates and updates sequentially in desired order,
    /// collecting failures.
    async fn run_upserts(&self, plan: &SyncPlan) -> Vec<OperationFailure> {
        let mut failures = Vec::new();

        for mutation in &plan.upserts {
            match mutation {
                Mutation::Create(section) => {
                    if let Err(error) = self.store.create(plan.lesson(), section).await {
                        failures.push(OperationFailure {
                            kind: MutationKind::Create,
                            id: section.id.as_str().to_string(),
                            error,
                        });
                    }
                }
                Mutation::Update(section) => {
                    // Updates always carry persisted ids by construction.
                    if let Some(id) = section.id.as_persisted() {
                        if let Err(error) = self.store.update(id, section).await {
                            failures.push(OperationFailure {
                                kind: MutationKind::Update,
                                id: id.to_string(),
                                error,
                            });
                        }
                    }
                }
            }
        }

        failures
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use coursesync_store::MemoryStore;
    use coursesync_testkit::fixtures::{persisted, provisional, text_section};

    fn lesson() -> LessonId {
        LessonId::new("lesson-1")
    }

    #[test]
    fn sync_state_checks() {
        assert!(SyncState::Idle.can_start_sync());
        assert!(SyncState::Synced.can_start_sync());
        assert!(SyncState::Error.can_start_sync());
        assert!(!SyncState::Deleting.can_start_sync());
        assert!(!SyncState::Upserting.can_start_sync());

        assert!(SyncState::Planning.is_active());
        assert!(SyncState::Refreshing.is_active());
        assert!(!SyncState::Idle.is_active());
        assert!(!SyncState::Synced.is_active());
    }

    #[test]
    fn engine_initial_state() {
        let engine = SyncEngine::new(SyncConfig::default(), MemoryStore::new());
        assert_eq!(engine.state(), SyncState::Idle);
        assert_eq!(engine.stats().cycles_completed, 0);
    }

    #[tokio::test]
    async fn successful_sync_updates_state_and_stats() {
        let store = MemoryStore::new();
        store.seed(&lesson(), vec![text_section(persisted("s1"), &lesson(), "a", 0)]);
        let engine = SyncEngine::new(SyncConfig::default(), store);

        let baseline = vec![text_section(persisted("s1"), &lesson(), "a", 0)];
        let desired = vec![
            text_section(persisted("s1"), &lesson(), "a", 0),
            text_section(provisional("tmp-1"), &lesson(), "b", 1),
        ];

        let result = engine.sync(&lesson(), &desired, &baseline).await.unwrap();
        assert_eq!(result.len(), 2);
        assert_eq!(engine.state(), SyncState::Synced);

        let stats = engine.stats();
        assert_eq!(stats.cycles_completed, 1);
        assert_eq!(stats.sections_created, 1);
        assert_eq!(stats.sections_unchanged, 1);
        assert!(stats.last_error.is_none());
    }

    #[tokio::test]
    async fn failed_sync_records_error_state() {
        let store = MemoryStore::new();
        let engine = SyncEngine::new(SyncConfig::default(), store);

        // Unknown persisted id with the default Reject policy.
        let desired = vec![text_section(persisted("ghost"), &lesson(), "a", 0)];
        let result = engine.sync(&lesson(), &desired, &[]).await;

        assert!(matches!(result, Err(SyncError::StaleBaseline { .. })));
        assert_eq!(engine.state(), SyncState::Error);
        assert!(engine.stats().last_error.is_some());
    }

    #[tokio::test]
    async fn engine_restarts_after_error() {
        let engine = SyncEngine::new(SyncConfig::default(), MemoryStore::new());

        let desired = vec![text_section(persisted("ghost"), &lesson(), "a", 0)];
        assert!(engine.sync(&lesson(), &desired, &[]).await.is_err());

        // Error state still allows a new pass.
        let result = engine.sync(&lesson(), &[], &[]).await.unwrap();
        assert!(result.is_empty());
        assert_eq!(engine.state(), SyncState::Synced);
    }

    #[test]
    fn cancel_flag_roundtrip() {
        let engine = SyncEngine::new(SyncConfig::default(), MemoryStore::new());

        assert!(engine.check_cancelled().is_ok());
        engine.cancel();
        assert!(matches!(
            engine.check_cancelled(),
            Err(SyncError::Cancelled)
        ));
        engine.reset_cancel();
        assert!(engine.check_cancelled().is_ok());

        // Note: sync() resets the cancel flag at the start, so calling
        // cancel() before sync() won't prevent the pass - cancellation
        // is for stopping an ongoing sync from another task.
    }
}
