use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct EntryRow {
    pub id: i64,
    pub remote_id: Option<String>,
    pub title: String,
    pub description: String,
    pub location: String,
    pub photo: Option<String>,
    pub created_at: i64,
    pub display_date: String,
    pub synced: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SyncQueueItemRow {
    pub id: i64,
    pub operation_type: String,
    pub entry_id: i64,
    pub payload: String,
    pub enqueued_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SettingRow {
    pub key: String,
    pub value: String,
    pub updated_at: i64,
}
