use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Result of one `reconcile` invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ReconcileOutcome {
    Offline,
    NothingToSync,
    Completed { synced: usize, remaining: usize },
    Failed { pending: usize, reason: String },
}

impl ReconcileOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, ReconcileOutcome::Failed { .. })
    }
}

/// Informational events rendered by the presentation layer as transient notices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SyncNotice {
    /// The remote store accepted the entry immediately.
    EntrySynced { title: String },
    /// The entry was kept locally and queued.
    EntryQueued { title: String, offline: bool },
    Reconciled { synced: usize, remaining: usize },
    ReconcileFailed { pending: usize, reason: String },
    /// Listing fell back to the local store.
    ServedFromLocal { count: usize },
    WentOnline,
    WentOffline,
    Cleared,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncStatusSnapshot {
    pub online: bool,
    pub queue_length: usize,
    pub unsynced_entries: usize,
    /// Unsynced entries that have no queue item.
    pub orphaned_entries: usize,
    pub reconcile_in_flight: bool,
    pub last_reconciled_at: Option<DateTime<Utc>>,
}

impl SyncStatusSnapshot {
    pub fn is_consistent(&self) -> bool {
        self.orphaned_entries == 0 && self.queue_length == self.unsynced_entries
    }
}
