use crate::domain::value_objects::{EntryId, RemoteEntryId};
use chrono::{DateTime, Local, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// Render pattern of `displayDate` (the `uk-UA` short date-time form).
pub const DISPLAY_DATE_FORMAT: &str = "%d.%m.%Y, %H:%M:%S";

/// User supplied fields of an entry that has not been persisted yet.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct EntryDraft {
    pub title: String,
    pub description: String,
    pub location: String,
    pub photo: Option<String>,
}

impl EntryDraft {
    pub fn new(title: impl Into<String>, description: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            location: location.into(),
            photo: None,
        }
    }

    pub fn with_photo(mut self, photo: impl Into<String>) -> Self {
        self.photo = Some(photo.into());
        self
    }

    /// Trims every text field and rejects a draft without a title.
    pub fn normalized(self) -> Result<Self, String> {
        let title = self.title.trim().to_string();
        if title.is_empty() {
            return Err("Entry title cannot be empty".to_string());
        }
        Ok(Self {
            title,
            description: self.description.trim().to_string(),
            location: self.location.trim().to_string(),
            photo: self.photo.filter(|photo| !photo.trim().is_empty()),
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    pub id: Option<EntryId>,
    pub remote_id: Option<RemoteEntryId>,
    pub title: String,
    pub description: String,
    pub location: String,
    pub photo: Option<String>,
    pub created_at: DateTime<Utc>,
    pub display_date: String,
    pub synced: bool,
}

impl Entry {
    pub fn from_draft(draft: EntryDraft, created_at: DateTime<Utc>) -> Self {
        Self {
            id: None,
            remote_id: None,
            title: draft.title,
            description: draft.description,
            location: draft.location,
            photo: draft.photo,
            created_at,
            display_date: format_display_date(created_at),
            synced: false,
        }
    }

    /// Builds the local copy of an entry the remote store already holds.
    pub fn from_remote(remote: RemoteEntry) -> Self {
        Self {
            id: None,
            display_date: remote
                .display_date
                .unwrap_or_else(|| format_display_date(remote.created_at)),
            remote_id: Some(remote.remote_id),
            title: remote.title,
            description: remote.description,
            location: remote.location,
            photo: remote.photo,
            created_at: remote.created_at,
            synced: true,
        }
    }

    pub fn with_id(mut self, id: EntryId) -> Self {
        self.id = Some(id);
        self
    }

    /// Flips the entry to synced. A remote id that is already set is kept.
    pub fn mark_synced(&mut self, remote_id: RemoteEntryId) {
        if self.remote_id.is_none() {
            self.remote_id = Some(remote_id);
        }
        self.synced = true;
    }

    pub fn is_pending(&self) -> bool {
        !self.synced
    }
}

/// An entry as returned by the remote entry service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RemoteEntry {
    pub remote_id: RemoteEntryId,
    pub title: String,
    pub description: String,
    pub location: String,
    pub photo: Option<String>,
    pub created_at: DateTime<Utc>,
    /// Date string stored by the service, kept verbatim when present.
    pub display_date: Option<String>,
}

pub fn format_display_date(created_at: DateTime<Utc>) -> String {
    created_at
        .with_timezone(&Local)
        .format(DISPLAY_DATE_FORMAT)
        .to_string()
}

/// Inverse of [`format_display_date`]. `None` for text in another shape.
pub fn parse_display_date(display_date: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(display_date.trim(), DISPLAY_DATE_FORMAT)
        .ok()?
        .and_local_timezone(Local)
        .earliest()
        .map(|local| local.with_timezone(&Utc))
}
