use super::mappers::{entry_from_row, payload_to_json, queue_item_from_row};
use super::queries::*;
use super::rows::{EntryRow, SettingRow, SyncQueueItemRow};
use crate::application::ports::{
    EntryCollection, LocalStore, SettingsCollection, SyncQueueCollection,
};
use crate::domain::entities::{Entry, SyncQueueItem, SyncQueueItemDraft};
use crate::domain::value_objects::{EntryId, RemoteEntryId, SyncOperationType, SyncQueueId};
use crate::infrastructure::database::ConnectionPool;
use crate::shared::error::AppError;
use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use sqlx::{Sqlite, Transaction};

/// SQLite backed local store. Writes that span two tables run in one
/// transaction.
#[derive(Clone)]
pub struct SqliteLocalStore {
    pool: ConnectionPool,
}

impl SqliteLocalStore {
    pub fn new(pool: ConnectionPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &ConnectionPool {
        &self.pool
    }

    async fn insert_entry_tx(
        tx: &mut Transaction<'_, Sqlite>,
        entry: &Entry,
    ) -> Result<EntryId, AppError> {
        let id: i64 = sqlx::query_scalar(INSERT_ENTRY)
            .bind(entry.remote_id.as_ref().map(|id| id.as_str().to_string()))
            .bind(&entry.title)
            .bind(&entry.description)
            .bind(&entry.location)
            .bind(&entry.photo)
            .bind(entry.created_at.timestamp_millis())
            .bind(&entry.display_date)
            .bind(entry.synced)
            .fetch_one(&mut **tx)
            .await?;
        EntryId::new(id).map_err(AppError::Database)
    }

    async fn enqueue_tx(
        tx: &mut Transaction<'_, Sqlite>,
        draft: &SyncQueueItemDraft,
    ) -> Result<SyncQueueId, AppError> {
        let entry_id = draft.entry_id().ok_or_else(|| {
            AppError::ValidationError("Queued entry must have a local id".to_string())
        })?;
        let id: i64 = sqlx::query_scalar(UPSERT_QUEUE_ITEM)
            .bind(draft.operation_type.as_str())
            .bind(entry_id.value())
            .bind(payload_to_json(&draft.payload)?)
            .bind(Utc::now().timestamp_millis())
            .fetch_one(&mut **tx)
            .await?;
        SyncQueueId::new(id).map_err(AppError::Database)
    }

    async fn fetch_entry_tx(
        tx: &mut Transaction<'_, Sqlite>,
        id: EntryId,
    ) -> Result<Option<Entry>, AppError> {
        let row = sqlx::query_as::<_, EntryRow>(&select_entries(ENTRY_BY_ID))
            .bind(id.value())
            .fetch_optional(&mut **tx)
            .await?;
        row.map(entry_from_row).transpose()
    }
}

#[async_trait]
impl EntryCollection for SqliteLocalStore {
    async fn add_entry(&self, entry: &Entry) -> Result<EntryId, AppError> {
        let mut tx = self.pool.get_pool().begin().await?;
        let id = Self::insert_entry_tx(&mut tx, entry).await?;
        tx.commit().await?;
        Ok(id)
    }

    async fn put_entry(&self, entry: &Entry) -> Result<EntryId, AppError> {
        let Some(id) = entry.id else {
            return self.add_entry(entry).await;
        };
        sqlx::query(UPSERT_ENTRY)
            .bind(id.value())
            .bind(entry.remote_id.as_ref().map(|id| id.as_str().to_string()))
            .bind(&entry.title)
            .bind(&entry.description)
            .bind(&entry.location)
            .bind(&entry.photo)
            .bind(entry.created_at.timestamp_millis())
            .bind(&entry.display_date)
            .bind(entry.synced)
            .execute(self.pool.get_pool())
            .await?;
        Ok(id)
    }

    async fn get_entry(&self, id: EntryId) -> Result<Option<Entry>, AppError> {
        let row = sqlx::query_as::<_, EntryRow>(&select_entries(ENTRY_BY_ID))
            .bind(id.value())
            .fetch_optional(self.pool.get_pool())
            .await?;
        row.map(entry_from_row).transpose()
    }

    async fn find_by_remote_id(
        &self,
        remote_id: &RemoteEntryId,
    ) -> Result<Option<Entry>, AppError> {
        let row = sqlx::query_as::<_, EntryRow>(&select_entries(ENTRY_BY_REMOTE_ID))
            .bind(remote_id.as_str())
            .fetch_optional(self.pool.get_pool())
            .await?;
        row.map(entry_from_row).transpose()
    }

    async fn all_entries(&self) -> Result<Vec<Entry>, AppError> {
        let rows = sqlx::query_as::<_, EntryRow>(&select_entries(ALL_ENTRIES))
            .fetch_all(self.pool.get_pool())
            .await?;
        rows.into_iter().map(entry_from_row).collect()
    }

    async fn clear_entries(&self) -> Result<(), AppError> {
        sqlx::query(DELETE_ALL_ENTRIES)
            .execute(self.pool.get_pool())
            .await?;
        Ok(())
    }
}

#[async_trait]
impl SyncQueueCollection for SqliteLocalStore {
    async fn enqueue(&self, draft: &SyncQueueItemDraft) -> Result<SyncQueueId, AppError> {
        let mut tx = self.pool.get_pool().begin().await?;
        let id = Self::enqueue_tx(&mut tx, draft).await?;
        tx.commit().await?;
        Ok(id)
    }

    async fn queued_items(&self) -> Result<Vec<SyncQueueItem>, AppError> {
        let rows = sqlx::query_as::<_, SyncQueueItemRow>(SELECT_QUEUE_ITEMS)
            .fetch_all(self.pool.get_pool())
            .await?;
        rows.into_iter().map(queue_item_from_row).collect()
    }

    async fn remove_queued(&self, id: SyncQueueId) -> Result<(), AppError> {
        sqlx::query(DELETE_QUEUE_ITEM)
            .bind(id.value())
            .execute(self.pool.get_pool())
            .await?;
        Ok(())
    }

    async fn clear_queue(&self) -> Result<(), AppError> {
        sqlx::query(DELETE_ALL_QUEUE_ITEMS)
            .execute(self.pool.get_pool())
            .await?;
        Ok(())
    }
}

#[async_trait]
impl SettingsCollection for SqliteLocalStore {
    async fn put_setting(&self, key: &str, value: &Value) -> Result<(), AppError> {
        sqlx::query(UPSERT_SETTING)
            .bind(key)
            .bind(serde_json::to_string(value)?)
            .bind(Utc::now().timestamp_millis())
            .execute(self.pool.get_pool())
            .await?;
        Ok(())
    }

    async fn get_setting(&self, key: &str) -> Result<Option<Value>, AppError> {
        let row = sqlx::query_as::<_, SettingRow>(SELECT_SETTING)
            .bind(key)
            .fetch_optional(self.pool.get_pool())
            .await?;
        row.map(|row| {
            serde_json::from_str(&row.value)
                .map_err(|err| AppError::DeserializationError(format!("setting {key}: {err}")))
        })
        .transpose()
    }
}

#[async_trait]
impl LocalStore for SqliteLocalStore {
    async fn record_pending(&self, entry: Entry) -> Result<(Entry, SyncQueueId), AppError> {
        let mut tx = self.pool.get_pool().begin().await?;
        let id = Self::insert_entry_tx(&mut tx, &entry).await?;
        let entry = entry.with_id(id);
        let draft = SyncQueueItemDraft {
            operation_type: SyncOperationType::CreateEntry,
            payload: entry.clone(),
        };
        let queue_id = Self::enqueue_tx(&mut tx, &draft).await?;
        tx.commit().await?;

        tracing::debug!(
            target: "sync::store",
            entry_id = %id,
            queue_id = %queue_id,
            "entry stored with pending queue item"
        );
        Ok((entry, queue_id))
    }

    async fn complete_queued(
        &self,
        item: &SyncQueueItem,
        remote_id: RemoteEntryId,
    ) -> Result<Option<Entry>, AppError> {
        let mut tx = self.pool.get_pool().begin().await?;
        sqlx::query(DELETE_QUEUE_ITEM)
            .bind(item.id.value())
            .execute(&mut *tx)
            .await?;

        let entry = match item.entry_id() {
            Some(entry_id) => {
                sqlx::query(MARK_ENTRY_SYNCED)
                    .bind(entry_id.value())
                    .bind(remote_id.as_str())
                    .execute(&mut *tx)
                    .await?;
                Self::fetch_entry_tx(&mut tx, entry_id).await?
            }
            None => None,
        };
        tx.commit().await?;
        Ok(entry)
    }

    async fn unsynced_entries(&self) -> Result<Vec<Entry>, AppError> {
        let rows = sqlx::query_as::<_, EntryRow>(&select_entries(UNSYNCED_ENTRIES))
            .fetch_all(self.pool.get_pool())
            .await?;
        rows.into_iter().map(entry_from_row).collect()
    }

    async fn clear_all(&self) -> Result<(), AppError> {
        let mut tx = self.pool.get_pool().begin().await?;
        sqlx::query(DELETE_ALL_QUEUE_ITEMS).execute(&mut *tx).await?;
        sqlx::query(DELETE_ALL_ENTRIES).execute(&mut *tx).await?;
        tx.commit().await?;
        Ok(())
    }
}
