use crate::domain::entities::{Entry, SyncQueueItem, SyncQueueItemDraft};
use crate::domain::value_objects::{EntryId, RemoteEntryId, SyncQueueId};
use crate::shared::error::AppError;
use async_trait::async_trait;
use serde_json::Value;

/// The `entries` collection.
#[async_trait]
pub trait EntryCollection: Send + Sync {
    /// Inserts a new record and returns the id the store assigned to it.
    async fn add_entry(&self, entry: &Entry) -> Result<EntryId, AppError>;
    /// Upserts by local id. An entry without an id is inserted.
    async fn put_entry(&self, entry: &Entry) -> Result<EntryId, AppError>;
    async fn get_entry(&self, id: EntryId) -> Result<Option<Entry>, AppError>;
    async fn find_by_remote_id(
        &self,
        remote_id: &RemoteEntryId,
    ) -> Result<Option<Entry>, AppError>;
    /// Every stored entry in insertion order.
    async fn all_entries(&self) -> Result<Vec<Entry>, AppError>;
    async fn clear_entries(&self) -> Result<(), AppError>;
}

/// The `sync-queue` collection.
#[async_trait]
pub trait SyncQueueCollection: Send + Sync {
    /// Queues a write. An existing item for the same entry is replaced so the
    /// queue never holds two payloads for one local id.
    async fn enqueue(&self, draft: &SyncQueueItemDraft) -> Result<SyncQueueId, AppError>;
    /// Snapshot of the queue in insertion order.
    async fn queued_items(&self) -> Result<Vec<SyncQueueItem>, AppError>;
    async fn remove_queued(&self, id: SyncQueueId) -> Result<(), AppError>;
    async fn clear_queue(&self) -> Result<(), AppError>;
}

/// The `settings` collection, keyed by string.
#[async_trait]
pub trait SettingsCollection: Send + Sync {
    async fn put_setting(&self, key: &str, value: &Value) -> Result<(), AppError>;
    async fn get_setting(&self, key: &str) -> Result<Option<Value>, AppError>;
}

/// Durable local store made of the three collections.
///
/// The provided methods span two collections and run as separate writes.
/// Stores that support cross-collection transactions override them so each
/// call commits or rolls back as a unit.
#[async_trait]
pub trait LocalStore: EntryCollection + SyncQueueCollection + SettingsCollection {
    /// Writes an unsynced entry and its queue item.
    async fn record_pending(&self, entry: Entry) -> Result<(Entry, SyncQueueId), AppError> {
        let id = self.add_entry(&entry).await?;
        let entry = entry.with_id(id);
        let draft =
            SyncQueueItemDraft::create_entry(entry.clone()).map_err(AppError::ValidationError)?;
        let queue_id = self.enqueue(&draft).await?;
        Ok((entry, queue_id))
    }

    /// Drops an acknowledged queue item and flips its entry to synced.
    /// Returns `None` when the entry no longer exists locally.
    async fn complete_queued(
        &self,
        item: &SyncQueueItem,
        remote_id: RemoteEntryId,
    ) -> Result<Option<Entry>, AppError> {
        self.remove_queued(item.id).await?;
        let Some(entry_id) = item.entry_id() else {
            return Ok(None);
        };
        let Some(mut entry) = self.get_entry(entry_id).await? else {
            return Ok(None);
        };
        entry.mark_synced(remote_id);
        self.put_entry(&entry).await?;
        Ok(Some(entry))
    }

    /// Stores a remote copy, reusing the local id of a record with the same
    /// remote id.
    async fn upsert_remote_entry(&self, entry: Entry) -> Result<Entry, AppError> {
        let existing = match &entry.remote_id {
            Some(remote_id) => self.find_by_remote_id(remote_id).await?,
            None => None,
        };
        let mut entry = entry;
        entry.id = existing.and_then(|local| local.id);
        let id = self.put_entry(&entry).await?;
        Ok(entry.with_id(id))
    }

    async fn unsynced_entries(&self) -> Result<Vec<Entry>, AppError> {
        let entries = self.all_entries().await?;
        Ok(entries.into_iter().filter(Entry::is_pending).collect())
    }

    async fn clear_all(&self) -> Result<(), AppError> {
        self.clear_queue().await?;
        self.clear_entries().await
    }
}
