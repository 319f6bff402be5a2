use crate::domain::entities::Entry;
use crate::domain::value_objects::{EntryId, SyncOperationType, SyncQueueId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Pending write waiting for the next reconcile.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SyncQueueItem {
    pub id: SyncQueueId,
    pub operation_type: SyncOperationType,
    pub payload: Entry,
    pub enqueued_at: DateTime<Utc>,
}

impl SyncQueueItem {
    pub fn new(
        id: SyncQueueId,
        operation_type: SyncOperationType,
        payload: Entry,
        enqueued_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            operation_type,
            payload,
            enqueued_at,
        }
    }

    pub fn entry_id(&self) -> Option<EntryId> {
        self.payload.id
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SyncQueueItemDraft {
    pub operation_type: SyncOperationType,
    pub payload: Entry,
}

impl SyncQueueItemDraft {
    /// Queue draft for an entry that already has its local id.
    pub fn create_entry(payload: Entry) -> Result<Self, String> {
        if payload.id.is_none() {
            return Err("Queued entry must have a local id".to_string());
        }
        Ok(Self {
            operation_type: SyncOperationType::CreateEntry,
            payload,
        })
    }

    pub fn entry_id(&self) -> Option<EntryId> {
        self.payload.id
    }
}
