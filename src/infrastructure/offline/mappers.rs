use super::rows::{EntryRow, SyncQueueItemRow};
use crate::domain::entities::{Entry, SyncQueueItem};
use crate::domain::value_objects::{EntryId, RemoteEntryId, SyncOperationType, SyncQueueId};
use crate::shared::error::AppError;
use chrono::{DateTime, Utc};

pub fn entry_from_row(row: EntryRow) -> Result<Entry, AppError> {
    let id = EntryId::new(row.id).map_err(AppError::DeserializationError)?;
    let remote_id = row
        .remote_id
        .map(RemoteEntryId::new)
        .transpose()
        .map_err(AppError::DeserializationError)?;

    Ok(Entry {
        id: Some(id),
        remote_id,
        title: row.title,
        description: row.description,
        location: row.location,
        photo: row.photo,
        created_at: millis_to_datetime(row.created_at)?,
        display_date: row.display_date,
        synced: row.synced,
    })
}

pub fn queue_item_from_row(row: SyncQueueItemRow) -> Result<SyncQueueItem, AppError> {
    let id = SyncQueueId::new(row.id).map_err(AppError::DeserializationError)?;
    let operation_type = row
        .operation_type
        .parse::<SyncOperationType>()
        .map_err(AppError::DeserializationError)?;
    let entry_id = EntryId::new(row.entry_id).map_err(AppError::DeserializationError)?;
    let mut payload: Entry = serde_json::from_str(&row.payload)
        .map_err(|err| AppError::DeserializationError(format!("queue payload {id}: {err}")))?;
    // The column is authoritative for which entry the item belongs to.
    payload.id = Some(entry_id);

    Ok(SyncQueueItem::new(
        id,
        operation_type,
        payload,
        millis_to_datetime(row.enqueued_at)?,
    ))
}

pub fn payload_to_json(entry: &Entry) -> Result<String, AppError> {
    Ok(serde_json::to_string(entry)?)
}

pub fn millis_to_datetime(millis: i64) -> Result<DateTime<Utc>, AppError> {
    DateTime::<Utc>::from_timestamp_millis(millis)
        .ok_or_else(|| AppError::DeserializationError(format!("invalid timestamp: {millis}")))
}
