use crate::application::ports::LocalStore;
use crate::domain::entities::SyncQueueItemDraft;
use crate::domain::value_objects::{EntryId, SyncQueueId};
use crate::shared::error::AppError;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OfflineReindexReport {
    pub unsynced_entry_count: usize,
    pub requeued_entry_ids: Vec<EntryId>,
    pub removed_queue_ids: Vec<SyncQueueId>,
    pub pending_queue_count: usize,
    pub emitted_at: i64,
}

impl OfflineReindexReport {
    pub fn repaired_anything(&self) -> bool {
        !self.requeued_entry_ids.is_empty() || !self.removed_queue_ids.is_empty()
    }
}

/// Restores the one-to-one pairing between unsynced entries and queue items.
pub struct OfflineReindexJob {
    store: Arc<dyn LocalStore>,
    gate: Arc<Mutex<()>>,
}

impl OfflineReindexJob {
    pub fn new(store: Arc<dyn LocalStore>) -> Arc<Self> {
        Self::with_gate(store, Arc::new(Mutex::new(())))
    }

    /// Shares `gate` with the reconcile loop so a pass never overlaps a
    /// batch being applied.
    pub fn with_gate(store: Arc<dyn LocalStore>, gate: Arc<Mutex<()>>) -> Arc<Self> {
        Arc::new(Self { store, gate })
    }

    /// Runs one pass, waiting for any pass already in progress.
    pub async fn run_guarded(&self) -> Result<OfflineReindexReport, AppError> {
        let _guard = self.gate.lock().await;
        match self.reindex_once().await {
            Ok(report) => {
                tracing::info!(
                    target: "sync::reindex",
                    requeued = report.requeued_entry_ids.len(),
                    removed = report.removed_queue_ids.len(),
                    pending = report.pending_queue_count,
                    "offline reindex completed"
                );
                Ok(report)
            }
            Err(err) => {
                tracing::error!(
                    target: "sync::reindex",
                    error = %err,
                    "offline reindex job failed"
                );
                Err(err)
            }
        }
    }

    pub async fn reindex_once(&self) -> Result<OfflineReindexReport, AppError> {
        // Queue before entries: a write landing in between is re-enqueued, not dropped.
        let queue = self.store.queued_items().await?;
        let entries = self.store.all_entries().await?;

        let synced_by_id: HashMap<EntryId, bool> = entries
            .iter()
            .filter_map(|entry| entry.id.map(|id| (id, entry.synced)))
            .collect();

        let mut removed_queue_ids = Vec::new();
        let mut queued_entries = HashSet::new();
        for item in &queue {
            let still_pending = item
                .entry_id()
                .and_then(|id| synced_by_id.get(&id))
                .map(|synced| !synced)
                .unwrap_or(false);
            match item.entry_id() {
                Some(entry_id) if still_pending && queued_entries.insert(entry_id) => {}
                _ => {
                    self.store.remove_queued(item.id).await?;
                    removed_queue_ids.push(item.id);
                }
            }
        }

        let unsynced: Vec<_> = entries.into_iter().filter(|entry| !entry.synced).collect();
        let mut requeued_entry_ids = Vec::new();
        for entry in &unsynced {
            let Some(entry_id) = entry.id else {
                continue;
            };
            if queued_entries.contains(&entry_id) {
                continue;
            }
            let draft = SyncQueueItemDraft::create_entry(entry.clone())
                .map_err(AppError::ValidationError)?;
            self.store.enqueue(&draft).await?;
            tracing::warn!(
                target: "sync::reindex",
                entry_id = %entry_id,
                "unsynced entry had no queue item; re-enqueued"
            );
            requeued_entry_ids.push(entry_id);
        }

        let pending_queue_count = self.store.queued_items().await?.len();

        Ok(OfflineReindexReport {
            unsynced_entry_count: unsynced.len(),
            requeued_entry_ids,
            removed_queue_ids,
            pending_queue_count,
            emitted_at: Utc::now().timestamp_millis(),
        })
    }
}
