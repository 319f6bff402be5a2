use crate::domain::entities::{parse_display_date, Entry, RemoteEntry};
use crate::domain::value_objects::RemoteEntryId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Body of `POST /entries`, and one element of the `POST /sync` batch.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EntryPayload {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none", default)]
    pub id: Option<String>,
    pub title: String,
    pub description: String,
    pub location: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub photo: Option<String>,
    pub date: String,
    pub timestamp: DateTime<Utc>,
}

impl EntryPayload {
    /// Payload for a create call. The remote id is never sent.
    pub fn for_create(entry: &Entry) -> Self {
        Self {
            id: None,
            ..Self::for_sync(entry)
        }
    }

    /// Payload for a batch sync. A known remote id turns the call into a replace.
    pub fn for_sync(entry: &Entry) -> Self {
        Self {
            id: entry.remote_id.as_ref().map(|id| id.as_str().to_string()),
            title: entry.title.clone(),
            description: entry.description.clone(),
            location: entry.location.clone(),
            photo: entry.photo.clone(),
            date: entry.display_date.clone(),
            timestamp: entry.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SyncRequest {
    pub entries: Vec<EntryPayload>,
}

/// Stored timestamps arrive either as ISO strings or epoch milliseconds.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum RemoteTimestamp {
    Millis(i64),
    Iso(DateTime<Utc>),
}

impl RemoteTimestamp {
    fn to_datetime(&self) -> Option<DateTime<Utc>> {
        match self {
            RemoteTimestamp::Millis(millis) => DateTime::<Utc>::from_timestamp_millis(*millis),
            RemoteTimestamp::Iso(at) => Some(*at),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RemoteEntryDto {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub photo: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub timestamp: Option<RemoteTimestamp>,
}

impl RemoteEntryDto {
    /// The creation time comes from `timestamp`, then from the stored `date`
    /// string, and only then from `fallback_created_at`.
    pub fn into_domain(self, fallback_created_at: DateTime<Utc>) -> Result<RemoteEntry, String> {
        let remote_id = RemoteEntryId::new(self.id)?;
        let display_date = self
            .date
            .map(|date| date.trim().to_string())
            .filter(|date| !date.is_empty());
        let created_at = self
            .timestamp
            .as_ref()
            .and_then(RemoteTimestamp::to_datetime)
            .or_else(|| display_date.as_deref().and_then(parse_display_date))
            .unwrap_or(fallback_created_at);
        Ok(RemoteEntry {
            remote_id,
            title: self.title,
            description: self.description.unwrap_or_default(),
            location: self.location.unwrap_or_default(),
            photo: self.photo.filter(|photo| !photo.is_empty()),
            created_at,
            display_date,
        })
    }
}
