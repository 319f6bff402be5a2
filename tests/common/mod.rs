#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use travel_journal_lib::application::ports::RemoteEntryApi;
use travel_journal_lib::domain::entities::{Entry, RemoteEntry};
use travel_journal_lib::domain::value_objects::RemoteEntryId;
use travel_journal_lib::infrastructure::connectivity::ConnectivityMonitor;
use travel_journal_lib::infrastructure::database::ConnectionPool;
use travel_journal_lib::infrastructure::offline::SqliteLocalStore;
use travel_journal_lib::{AppError, SyncCoordinator};

/// In-process stand-in for the remote entry service.
#[derive(Default)]
pub struct StubRemote {
    stored: Mutex<Vec<RemoteEntry>>,
    next_id: AtomicUsize,
    failing: AtomicBool,
    pub create_calls: AtomicUsize,
    pub list_calls: AtomicUsize,
    pub batch_calls: AtomicUsize,
}

impl StubRemote {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn stored(&self) -> Vec<RemoteEntry> {
        self.stored.lock().unwrap().clone()
    }

    fn check(&self) -> Result<(), AppError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(AppError::Network("stub remote unavailable".into()));
        }
        Ok(())
    }

    fn insert(&self, entry: &Entry) -> RemoteEntry {
        let n = self.next_id.fetch_add(1, Ordering::SeqCst);
        let remote = RemoteEntry {
            remote_id: RemoteEntryId::new(format!("remote-{n}")).unwrap(),
            title: entry.title.clone(),
            description: entry.description.clone(),
            location: entry.location.clone(),
            photo: entry.photo.clone(),
            created_at: entry.created_at,
            display_date: Some(entry.display_date.clone()),
        };
        self.stored.lock().unwrap().push(remote.clone());
        remote
    }

    fn replace(&self, remote_id: &RemoteEntryId, entry: &Entry) -> Option<RemoteEntry> {
        let mut stored = self.stored.lock().unwrap();
        let slot = stored.iter_mut().find(|r| &r.remote_id == remote_id)?;
        slot.title = entry.title.clone();
        slot.description = entry.description.clone();
        slot.location = entry.location.clone();
        slot.photo = entry.photo.clone();
        Some(slot.clone())
    }
}

#[async_trait]
impl RemoteEntryApi for StubRemote {
    async fn create_entry(&self, entry: &Entry) -> Result<RemoteEntry, AppError> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        Ok(self.insert(entry))
    }

    async fn list_entries(&self) -> Result<Vec<RemoteEntry>, AppError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        let mut entries = self.stored();
        entries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(entries)
    }

    async fn batch_sync(&self, entries: &[Entry]) -> Result<Vec<Option<RemoteEntry>>, AppError> {
        self.batch_calls.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        Ok(entries
            .iter()
            .map(|entry| match &entry.remote_id {
                Some(remote_id) => self.replace(remote_id, entry),
                None => Some(self.insert(entry)),
            })
            .collect())
    }
}

pub async fn memory_store() -> Arc<SqliteLocalStore> {
    let pool = ConnectionPool::from_memory().await.unwrap();
    pool.migrate().await.unwrap();
    Arc::new(SqliteLocalStore::new(pool))
}

pub struct Journal {
    pub store: Arc<SqliteLocalStore>,
    pub remote: Arc<StubRemote>,
    pub monitor: Arc<ConnectivityMonitor>,
    pub coordinator: Arc<SyncCoordinator>,
}

pub async fn journal(online: bool) -> Journal {
    let store = memory_store().await;
    let remote = StubRemote::new();
    let monitor = ConnectivityMonitor::new(online);
    let coordinator = Arc::new(SyncCoordinator::new(
        store.clone(),
        remote.clone(),
        monitor.clone(),
    ));
    Journal {
        store,
        remote,
        monitor,
        coordinator,
    }
}
