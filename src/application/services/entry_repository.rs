use super::sync_coordinator::SyncCoordinator;
use crate::domain::entities::{
    Entry, EntryDraft, ReconcileOutcome, SyncNotice, SyncStatusSnapshot, TripReminder,
};
use crate::shared::error::AppError;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::broadcast;

/// Entry point for presentation code: submit drafts, read the current list.
#[derive(Clone)]
pub struct EntryRepository {
    coordinator: Arc<SyncCoordinator>,
}

impl EntryRepository {
    pub fn new(coordinator: Arc<SyncCoordinator>) -> Self {
        Self { coordinator }
    }

    pub async fn submit(&self, draft: EntryDraft) -> Result<Entry, AppError> {
        self.coordinator.record_entry(draft).await
    }

    /// Best known list, newest first.
    pub async fn current_entries(&self) -> Result<Vec<Entry>, AppError> {
        let mut entries = self.coordinator.list_entries().await?;
        sort_newest_first(&mut entries);
        Ok(entries)
    }

    pub async fn sync_now(&self) -> Result<ReconcileOutcome, AppError> {
        self.coordinator.reconcile().await
    }

    pub async fn status(&self) -> Result<SyncStatusSnapshot, AppError> {
        self.coordinator.status().await
    }

    pub async fn clear_all(&self) -> Result<(), AppError> {
        self.coordinator.clear_all().await
    }

    pub fn notices(&self) -> broadcast::Receiver<SyncNotice> {
        self.coordinator.subscribe_notices()
    }

    /// Anniversary reminder for the newest entry, if today is one.
    pub async fn trip_reminder(&self, now: DateTime<Utc>) -> Result<Option<TripReminder>, AppError> {
        let entries = self.current_entries().await?;
        Ok(entries
            .first()
            .and_then(|latest| TripReminder::for_entry(latest, now)))
    }
}

pub fn sort_newest_first(entries: &mut [Entry]) {
    entries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}
