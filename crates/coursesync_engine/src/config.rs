//! Configuration for the sync engine.

/// How the planner treats a desired section whose persisted id is absent
/// from the baseline snapshot.
///
/// An unknown persisted id means the caller's baseline is stale: the
/// section was fetched under a different snapshot, or the collection was
/// modified out of band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StalePolicy {
    /// Fail the sync before any mutation is issued.
    #[default]
    Reject,
    /// Recreate the section under a fresh store-assigned id.
    CreateMissing,
}

/// Configuration for sync operations.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Maximum number of concurrent delete calls.
    pub delete_concurrency: usize,
    /// Policy for persisted ids unknown to the baseline.
    pub stale_policy: StalePolicy,
}

impl SyncConfig {
    /// Creates a configuration with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self {
            delete_concurrency: 8,
            stale_policy: StalePolicy::default(),
        }
    }

    /// Sets the delete concurrency (clamped to at least 1).
    #[must_use]
    pub fn with_delete_concurrency(mut self, concurrency: usize) -> Self {
        self.delete_concurrency = concurrency.max(1);
        self
    }

    /// Sets the stale-baseline policy.
    #[must_use]
    pub fn with_stale_policy(mut self, policy: StalePolicy) -> Self {
        self.stale_policy = policy;
        self
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_builder() {
        let config = SyncConfig::new()
            .with_delete_concurrency(4)
            .with_stale_policy(StalePolicy::CreateMissing);

        assert_eq!(config.delete_concurrency, 4);
        assert_eq!(config.stale_policy, StalePolicy::CreateMissing);
    }

    #[test]
    fn delete_concurrency_clamped() {
        let config = SyncConfig::new().with_delete_concurrency(0);
        assert_eq!(config.delete_concurrency, 1);
    }

    #[test]
    fn defaults() {
        let config = SyncConfig::default();
        assert_eq!(config.delete_concurrency, 8);
        assert_eq!(config.stale_policy, StalePolicy::Reject);
    }
}
