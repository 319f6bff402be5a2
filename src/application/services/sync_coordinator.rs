use crate::application::ports::{ConnectivityEvent, ConnectivitySource, LocalStore, RemoteEntryApi};
use crate::domain::entities::{
    Entry, EntryDraft, ReconcileOutcome, SyncNotice, SyncStatusSnapshot,
};
use crate::shared::error::AppError;
use chrono::{DateTime, Utc};
use serde_json::json;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::{broadcast, Mutex};
use tokio::task::JoinHandle;

pub const LAST_RECONCILED_AT_KEY: &str = "sync.last_reconciled_at";

const NOTICE_CAPACITY: usize = 128;

/// Decides where each write lands and replays queued writes once the remote
/// store is reachable.
pub struct SyncCoordinator {
    store: Arc<dyn LocalStore>,
    remote: Arc<dyn RemoteEntryApi>,
    connectivity: Arc<dyn ConnectivitySource>,
    notices: broadcast::Sender<SyncNotice>,
    reconcile_gate: Arc<Mutex<()>>,
    reconcile_in_flight: AtomicBool,
}

struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn enter(flag: &'a AtomicBool) -> Self {
        flag.store(true, Ordering::SeqCst);
        Self(flag)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl SyncCoordinator {
    pub fn new(
        store: Arc<dyn LocalStore>,
        remote: Arc<dyn RemoteEntryApi>,
        connectivity: Arc<dyn ConnectivitySource>,
    ) -> Self {
        let (notices, _) = broadcast::channel(NOTICE_CAPACITY);
        Self {
            store,
            remote,
            connectivity,
            notices,
            reconcile_gate: Arc::new(Mutex::new(())),
            reconcile_in_flight: AtomicBool::new(false),
        }
    }

    pub fn subscribe_notices(&self) -> broadcast::Receiver<SyncNotice> {
        self.notices.subscribe()
    }

    /// Gate serializing reconcile runs and other writers that must not
    /// interleave with a batch being applied.
    pub fn reconcile_gate(&self) -> Arc<Mutex<()>> {
        Arc::clone(&self.reconcile_gate)
    }

    pub fn is_online(&self) -> bool {
        self.connectivity.is_online()
    }

    fn notify(&self, notice: SyncNotice) {
        let _ = self.notices.send(notice);
    }

    /// Persists a new entry, remotely first when online. Network trouble only
    /// downgrades the write to a queued one; local store failures are returned.
    pub async fn record_entry(&self, draft: EntryDraft) -> Result<Entry, AppError> {
        let draft = draft.normalized().map_err(AppError::ValidationError)?;
        let mut entry = Entry::from_draft(draft, Utc::now());
        let online = self.connectivity.is_online();

        if online {
            match self.remote.create_entry(&entry).await {
                Ok(remote) => {
                    entry.mark_synced(remote.remote_id);
                    let id = self.store.add_entry(&entry).await?;
                    let entry = entry.with_id(id);
                    tracing::info!(
                        target: "sync::coordinator",
                        entry_id = %id,
                        "entry stored remotely"
                    );
                    self.notify(SyncNotice::EntrySynced {
                        title: entry.title.clone(),
                    });
                    return Ok(entry);
                }
                Err(err) => {
                    tracing::warn!(
                        target: "sync::coordinator",
                        error = %err,
                        "remote create failed; queueing entry locally"
                    );
                }
            }
        }

        let (entry, queue_id) = self.store.record_pending(entry).await?;
        tracing::info!(
            target: "sync::coordinator",
            entry_id = ?entry.id,
            queue_id = %queue_id,
            online,
            "entry queued for sync"
        );
        self.notify(SyncNotice::EntryQueued {
            title: entry.title.clone(),
            offline: !online,
        });
        Ok(entry)
    }

    /// Replays the sync queue as one batch. Invocations are serialized; a
    /// caller arriving while a run is in progress waits and then sees the
    /// queue that run left behind.
    pub async fn reconcile(&self) -> Result<ReconcileOutcome, AppError> {
        let _guard = self.reconcile_gate.lock().await;
        let _in_flight = InFlight::enter(&self.reconcile_in_flight);
        self.reconcile_locked().await
    }

    async fn reconcile_locked(&self) -> Result<ReconcileOutcome, AppError> {
        if !self.connectivity.is_online() {
            tracing::debug!(target: "sync::coordinator", "reconcile skipped while offline");
            return Ok(ReconcileOutcome::Offline);
        }

        let queue = self.store.queued_items().await?;
        if queue.is_empty() {
            return Ok(ReconcileOutcome::NothingToSync);
        }

        let payloads: Vec<Entry> = queue.iter().map(|item| item.payload.clone()).collect();
        let acknowledged = match self.remote.batch_sync(&payloads).await {
            Ok(acknowledged) => acknowledged,
            Err(err) => {
                let reason = err.to_string();
                tracing::warn!(
                    target: "sync::coordinator",
                    pending = queue.len(),
                    error = %reason,
                    "batch sync failed; queue left untouched"
                );
                self.notify(SyncNotice::ReconcileFailed {
                    pending: queue.len(),
                    reason: reason.clone(),
                });
                return Ok(ReconcileOutcome::Failed {
                    pending: queue.len(),
                    reason,
                });
            }
        };

        let mut synced = 0usize;
        for (item, ack) in queue.iter().zip(acknowledged) {
            let Some(remote) = ack else {
                continue;
            };
            self.store.complete_queued(item, remote.remote_id).await?;
            synced += 1;
        }
        let remaining = queue.len() - synced;

        self.store
            .put_setting(
                LAST_RECONCILED_AT_KEY,
                &json!(Utc::now().timestamp_millis()),
            )
            .await?;

        tracing::info!(
            target: "sync::coordinator",
            synced,
            remaining,
            "reconcile completed"
        );
        self.notify(SyncNotice::Reconciled { synced, remaining });
        Ok(ReconcileOutcome::Completed { synced, remaining })
    }

    /// Remote list when reachable (stored locally by remote id), else the
    /// local store contents in storage order.
    pub async fn list_entries(&self) -> Result<Vec<Entry>, AppError> {
        if self.connectivity.is_online() {
            match self.remote.list_entries().await {
                Ok(remote_entries) => {
                    // A batch in flight may be about to attach one of these
                    // remote ids to a pending row.
                    let _guard = self.reconcile_gate.lock().await;
                    let mut entries = Vec::with_capacity(remote_entries.len());
                    for remote in remote_entries {
                        let entry = Entry::from_remote(remote);
                        match self.store.upsert_remote_entry(entry.clone()).await {
                            Ok(stored) => entries.push(stored),
                            Err(err) => {
                                tracing::error!(
                                    target: "sync::coordinator",
                                    error = %err,
                                    remote_id = ?entry.remote_id,
                                    "failed to store remote entry locally"
                                );
                                entries.push(entry);
                            }
                        }
                    }
                    return Ok(entries);
                }
                Err(err) => {
                    tracing::warn!(
                        target: "sync::coordinator",
                        error = %err,
                        "remote list failed; serving local entries"
                    );
                }
            }
        }

        let entries = self.store.all_entries().await?;
        self.notify(SyncNotice::ServedFromLocal {
            count: entries.len(),
        });
        Ok(entries)
    }

    pub async fn status(&self) -> Result<SyncStatusSnapshot, AppError> {
        let queue = self.store.queued_items().await?;
        let unsynced = self.store.unsynced_entries().await?;

        let queued_ids: HashSet<_> = queue.iter().filter_map(|item| item.entry_id()).collect();
        let orphaned_entries = unsynced
            .iter()
            .filter(|entry| entry.id.map_or(true, |id| !queued_ids.contains(&id)))
            .count();

        let last_reconciled_at = self
            .store
            .get_setting(LAST_RECONCILED_AT_KEY)
            .await?
            .and_then(|value| value.as_i64())
            .and_then(DateTime::<Utc>::from_timestamp_millis);

        Ok(SyncStatusSnapshot {
            online: self.connectivity.is_online(),
            queue_length: queue.len(),
            unsynced_entries: unsynced.len(),
            orphaned_entries,
            reconcile_in_flight: self.reconcile_in_flight.load(Ordering::SeqCst),
            last_reconciled_at,
        })
    }

    /// Removes every entry and queued write. Explicit user action only.
    pub async fn clear_all(&self) -> Result<(), AppError> {
        let _guard = self.reconcile_gate.lock().await;
        self.store.clear_all().await?;
        tracing::info!(target: "sync::coordinator", "local journal cleared");
        self.notify(SyncNotice::Cleared);
        Ok(())
    }

    pub async fn handle_connectivity_event(
        &self,
        event: ConnectivityEvent,
    ) -> Option<ReconcileOutcome> {
        match event {
            ConnectivityEvent::WentOffline => {
                self.notify(SyncNotice::WentOffline);
                None
            }
            ConnectivityEvent::WentOnline => {
                self.notify(SyncNotice::WentOnline);
                match self.reconcile().await {
                    Ok(outcome) => Some(outcome),
                    Err(err) => {
                        tracing::error!(
                            target: "sync::coordinator",
                            error = %err,
                            "reconcile after reconnect failed"
                        );
                        None
                    }
                }
            }
        }
    }

    /// Runs `reconcile` once per online transition until the returned
    /// subscription is dropped.
    pub fn spawn_reconcile_listener(self: &Arc<Self>) -> ReconcileSubscription {
        let mut events = self.connectivity.subscribe();
        let coordinator = Arc::clone(self);
        let handle = tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(event) => {
                        coordinator.handle_connectivity_event(event).await;
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::warn!(
                            target: "sync::coordinator",
                            skipped,
                            "connectivity events dropped"
                        );
                        if coordinator.is_online() {
                            coordinator
                                .handle_connectivity_event(ConnectivityEvent::WentOnline)
                                .await;
                        }
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        });
        ReconcileSubscription { handle }
    }
}

/// Handle of the reconnect listener; dropping it unsubscribes.
pub struct ReconcileSubscription {
    handle: JoinHandle<()>,
}

impl ReconcileSubscription {
    pub fn unsubscribe(self) {}

    pub fn is_active(&self) -> bool {
        !self.handle.is_finished()
    }
}

impl Drop for ReconcileSubscription {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{EntryCollection, SettingsCollection, SyncQueueCollection};
    use crate::domain::entities::RemoteEntry;
    use crate::domain::value_objects::RemoteEntryId;
    use crate::infrastructure::connectivity::ConnectivityMonitor;
    use crate::infrastructure::database::ConnectionPool;
    use crate::infrastructure::offline::SqliteLocalStore;
    use async_trait::async_trait;
    use mockall::mock;
    use std::time::Duration;

    mock! {
        pub Remote {}

        #[async_trait]
        impl RemoteEntryApi for Remote {
            async fn create_entry(&self, entry: &Entry) -> Result<RemoteEntry, AppError>;
            async fn list_entries(&self) -> Result<Vec<RemoteEntry>, AppError>;
            async fn batch_sync(&self, entries: &[Entry]) -> Result<Vec<Option<RemoteEntry>>, AppError>;
        }
    }

    struct Harness {
        store: Arc<SqliteLocalStore>,
        monitor: Arc<ConnectivityMonitor>,
        coordinator: Arc<SyncCoordinator>,
    }

    async fn harness(remote: MockRemote, online: bool) -> Harness {
        let pool = ConnectionPool::from_memory().await.unwrap();
        pool.migrate().await.unwrap();
        let store = Arc::new(SqliteLocalStore::new(pool));
        let monitor = ConnectivityMonitor::new(online);
        let coordinator = Arc::new(SyncCoordinator::new(
            store.clone(),
            Arc::new(remote),
            monitor.clone(),
        ));
        Harness {
            store,
            monitor,
            coordinator,
        }
    }

    fn remote_copy(entry: &Entry, id: &str) -> RemoteEntry {
        RemoteEntry {
            remote_id: RemoteEntryId::parse(id).unwrap(),
            title: entry.title.clone(),
            description: entry.description.clone(),
            location: entry.location.clone(),
            photo: entry.photo.clone(),
            created_at: entry.created_at,
            display_date: Some(entry.display_date.clone()),
        }
    }

    fn acknowledge_all(entries: &[Entry]) -> Result<Vec<Option<RemoteEntry>>, AppError> {
        Ok(entries
            .iter()
            .enumerate()
            .map(|(i, entry)| Some(remote_copy(entry, &format!("r-{i}"))))
            .collect())
    }

    fn lviv() -> EntryDraft {
        EntryDraft::new("Lviv", "Great coffee", "Lviv, UA")
    }

    #[tokio::test]
    async fn online_record_is_stored_synced_without_queue_item() {
        let mut remote = MockRemote::new();
        remote
            .expect_create_entry()
            .times(1)
            .returning(|entry| Ok(remote_copy(entry, "65f0aa")));
        let h = harness(remote, true).await;

        let entry = h.coordinator.record_entry(lviv()).await.unwrap();

        assert!(entry.synced);
        assert_eq!(entry.remote_id.as_ref().unwrap().as_str(), "65f0aa");
        assert!(entry.id.is_some());
        assert!(h.store.queued_items().await.unwrap().is_empty());
        let stored = h.store.get_entry(entry.id.unwrap()).await.unwrap().unwrap();
        assert!(stored.synced);
    }

    #[tokio::test]
    async fn remote_failure_downgrades_to_queued_write() {
        let mut remote = MockRemote::new();
        remote
            .expect_create_entry()
            .times(1)
            .returning(|_| Err(AppError::Network("503".into())));
        let h = harness(remote, true).await;
        let mut notices = h.coordinator.subscribe_notices();

        let entry = h.coordinator.record_entry(lviv()).await.unwrap();

        assert!(!entry.synced);
        assert!(entry.remote_id.is_none());
        assert_eq!(h.store.queued_items().await.unwrap().len(), 1);
        assert_eq!(
            notices.recv().await.unwrap(),
            SyncNotice::EntryQueued {
                title: "Lviv".into(),
                offline: false
            }
        );
    }

    #[tokio::test]
    async fn offline_records_never_touch_remote_and_stay_paired() {
        let mut remote = MockRemote::new();
        remote.expect_create_entry().never();
        let h = harness(remote, false).await;

        for i in 0..5 {
            let draft = EntryDraft::new(format!("trip {i}"), "", "");
            h.coordinator.record_entry(draft).await.unwrap();
            let queue = h.store.queued_items().await.unwrap();
            let unsynced = h.store.unsynced_entries().await.unwrap();
            assert_eq!(queue.len(), unsynced.len());
        }
        assert_eq!(h.store.queued_items().await.unwrap().len(), 5);
    }

    #[tokio::test]
    async fn blank_title_is_rejected_before_any_write() {
        let mut remote = MockRemote::new();
        remote.expect_create_entry().never();
        let h = harness(remote, true).await;

        let err = h
            .coordinator
            .record_entry(EntryDraft::new("  ", "x", "y"))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::ValidationError(_)));
        assert!(h.store.all_entries().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn local_store_failure_is_surfaced() {
        let remote = MockRemote::new();
        let h = harness(remote, false).await;
        sqlx::query("DROP TABLE sync_queue")
            .execute(h.store.pool().get_pool())
            .await
            .unwrap();

        let err = h.coordinator.record_entry(lviv()).await.unwrap_err();
        assert!(err.is_local_store());
        assert!(h.store.all_entries().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn reconcile_converges_on_success() {
        let mut remote = MockRemote::new();
        remote
            .expect_batch_sync()
            .times(1)
            .returning(|entries| acknowledge_all(entries));
        let h = harness(remote, false).await;
        for title in ["one", "two", "three"] {
            h.coordinator
                .record_entry(EntryDraft::new(title, "", ""))
                .await
                .unwrap();
        }
        h.monitor.set_online(true);

        let outcome = h.coordinator.reconcile().await.unwrap();

        assert_eq!(
            outcome,
            ReconcileOutcome::Completed {
                synced: 3,
                remaining: 0
            }
        );
        assert!(h.store.queued_items().await.unwrap().is_empty());
        let entries = h.store.all_entries().await.unwrap();
        assert!(entries.iter().all(|e| e.synced && e.remote_id.is_some()));
        assert!(h
            .store
            .get_setting(LAST_RECONCILED_AT_KEY)
            .await
            .unwrap()
            .is_some());
    }

    #[tokio::test]
    async fn reconcile_failure_leaves_store_untouched() {
        let mut remote = MockRemote::new();
        remote
            .expect_batch_sync()
            .times(1)
            .returning(|_| Err(AppError::Network("connection reset".into())));
        let h = harness(remote, false).await;
        h.coordinator.record_entry(lviv()).await.unwrap();
        h.coordinator
            .record_entry(EntryDraft::new("Odesa", "Sea", "Odesa, UA"))
            .await
            .unwrap();
        let queue_before = h.store.queued_items().await.unwrap();
        let entries_before = h.store.all_entries().await.unwrap();
        h.monitor.set_online(true);

        let outcome = h.coordinator.reconcile().await.unwrap();

        assert!(outcome.is_failure());
        assert_eq!(h.store.queued_items().await.unwrap(), queue_before);
        assert_eq!(h.store.all_entries().await.unwrap(), entries_before);
        assert!(h
            .store
            .get_setting(LAST_RECONCILED_AT_KEY)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn second_reconcile_makes_no_network_call() {
        let mut remote = MockRemote::new();
        remote
            .expect_batch_sync()
            .times(1)
            .returning(|entries| acknowledge_all(entries));
        let h = harness(remote, false).await;
        h.coordinator.record_entry(lviv()).await.unwrap();
        h.monitor.set_online(true);

        h.coordinator.reconcile().await.unwrap();
        let second = h.coordinator.reconcile().await.unwrap();

        assert_eq!(second, ReconcileOutcome::NothingToSync);
    }

    #[tokio::test]
    async fn reconcile_is_a_no_op_offline() {
        let mut remote = MockRemote::new();
        remote.expect_batch_sync().never();
        let h = harness(remote, false).await;
        h.coordinator.record_entry(lviv()).await.unwrap();

        let outcome = h.coordinator.reconcile().await.unwrap();

        assert_eq!(outcome, ReconcileOutcome::Offline);
        assert_eq!(h.store.queued_items().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn partial_acknowledgement_keeps_rejected_items_queued() {
        let mut remote = MockRemote::new();
        remote.expect_batch_sync().times(1).returning(|entries| {
            Ok(vec![Some(remote_copy(&entries[0], "r-0")), None])
        });
        let h = harness(remote, false).await;
        for title in ["one", "two", "three"] {
            h.coordinator
                .record_entry(EntryDraft::new(title, "", ""))
                .await
                .unwrap();
        }
        h.monitor.set_online(true);

        let outcome = h.coordinator.reconcile().await.unwrap();

        assert_eq!(
            outcome,
            ReconcileOutcome::Completed {
                synced: 1,
                remaining: 2
            }
        );
        let queue = h.store.queued_items().await.unwrap();
        let titles: Vec<_> = queue.iter().map(|item| item.payload.title.as_str()).collect();
        assert_eq!(titles, vec!["two", "three"]);
        let unsynced = h.store.unsynced_entries().await.unwrap();
        assert_eq!(unsynced.len(), 2);
    }

    #[tokio::test]
    async fn list_prefers_remote_when_online() {
        let mut remote = MockRemote::new();
        remote.expect_list_entries().times(1).returning(|| {
            let seed = Entry::from_draft(EntryDraft::new("Remote trip", "", ""), Utc::now());
            Ok(vec![remote_copy(&seed, "r-77")])
        });
        let h = harness(remote, true).await;

        let first = h.coordinator.list_entries().await.unwrap();

        assert_eq!(first.len(), 1);
        assert!(first[0].synced);
        assert_eq!(first[0].title, "Remote trip");
        assert_eq!(h.store.all_entries().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn list_upserts_by_remote_id() {
        let mut remote = MockRemote::new();
        let seed = Entry::from_draft(EntryDraft::new("Remote trip", "", ""), Utc::now());
        remote
            .expect_list_entries()
            .times(2)
            .returning(move || Ok(vec![remote_copy(&seed, "r-77")]));
        let h = harness(remote, true).await;

        let first = h.coordinator.list_entries().await.unwrap();
        let second = h.coordinator.list_entries().await.unwrap();

        assert_eq!(first[0].id, second[0].id);
        assert_eq!(h.store.all_entries().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn list_falls_back_to_local_when_remote_fails() {
        let mut remote = MockRemote::new();
        remote
            .expect_create_entry()
            .returning(|_| Err(AppError::Network("down".into())));
        remote
            .expect_list_entries()
            .times(1)
            .returning(|| Err(AppError::Network("down".into())));
        let h = harness(remote, true).await;
        h.coordinator
            .record_entry(EntryDraft::new("older", "", ""))
            .await
            .unwrap();
        h.coordinator
            .record_entry(EntryDraft::new("newer", "", ""))
            .await
            .unwrap();

        let entries = h.coordinator.list_entries().await.unwrap();

        let titles: Vec<_> = entries.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["older", "newer"]);
    }

    #[tokio::test]
    async fn list_offline_never_calls_remote() {
        let mut remote = MockRemote::new();
        remote.expect_list_entries().never();
        let h = harness(remote, false).await;
        h.coordinator.record_entry(lviv()).await.unwrap();

        let entries = h.coordinator.list_entries().await.unwrap();
        assert_eq!(entries.len(), 1);
        assert!(!entries[0].synced);
    }

    #[tokio::test]
    async fn status_reports_orphans_and_queue() {
        let remote = MockRemote::new();
        let h = harness(remote, false).await;
        h.coordinator.record_entry(lviv()).await.unwrap();
        let orphan = Entry::from_draft(EntryDraft::new("orphan", "", ""), Utc::now());
        h.store.add_entry(&orphan).await.unwrap();

        let status = h.coordinator.status().await.unwrap();

        assert!(!status.online);
        assert_eq!(status.queue_length, 1);
        assert_eq!(status.unsynced_entries, 2);
        assert_eq!(status.orphaned_entries, 1);
        assert!(!status.reconcile_in_flight);
        assert!(status.last_reconciled_at.is_none());
        assert!(!status.is_consistent());
    }

    #[tokio::test]
    async fn clear_all_empties_the_journal() {
        let remote = MockRemote::new();
        let h = harness(remote, false).await;
        h.coordinator.record_entry(lviv()).await.unwrap();

        h.coordinator.clear_all().await.unwrap();

        let status = h.coordinator.status().await.unwrap();
        assert_eq!(status.queue_length, 0);
        assert_eq!(status.unsynced_entries, 0);
        assert!(h.store.all_entries().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn concurrent_reconciles_submit_one_batch() {
        let mut remote = MockRemote::new();
        remote
            .expect_batch_sync()
            .times(1)
            .returning(|entries| acknowledge_all(entries));
        let h = harness(remote, false).await;
        h.coordinator.record_entry(lviv()).await.unwrap();
        h.monitor.set_online(true);

        let (a, b) = tokio::join!(h.coordinator.reconcile(), h.coordinator.reconcile());

        let outcomes = [a.unwrap(), b.unwrap()];
        assert!(outcomes.contains(&ReconcileOutcome::NothingToSync));
        assert!(outcomes.contains(&ReconcileOutcome::Completed {
            synced: 1,
            remaining: 0
        }));
    }

    #[tokio::test]
    async fn online_transition_triggers_reconcile() {
        let mut remote = MockRemote::new();
        remote
            .expect_batch_sync()
            .times(1)
            .returning(|entries| acknowledge_all(entries));
        let h = harness(remote, false).await;
        h.coordinator.record_entry(lviv()).await.unwrap();
        let mut notices = h.coordinator.subscribe_notices();
        let subscription = h.coordinator.spawn_reconcile_listener();

        h.monitor.set_online(true);

        let reconciled = tokio::time::timeout(Duration::from_secs(5), async {
            loop {
                if let Ok(SyncNotice::Reconciled { synced, .. }) = notices.recv().await {
                    return synced;
                }
            }
        })
        .await
        .unwrap();
        assert_eq!(reconciled, 1);
        assert!(subscription.is_active());
        subscription.unsubscribe();
        assert!(h.store.queued_items().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn lviv_offline_then_reconnect_scenario() {
        let mut remote = MockRemote::new();
        remote.expect_create_entry().never();
        remote
            .expect_batch_sync()
            .times(1)
            .returning(|entries| Ok(vec![Some(remote_copy(&entries[0], "65f0lviv"))]));
        let h = harness(remote, false).await;

        let entry = h.coordinator.record_entry(lviv()).await.unwrap();
        assert!(!entry.synced);
        let queue = h.store.queued_items().await.unwrap();
        assert_eq!(queue.len(), 1);
        assert_eq!(queue[0].payload.id, entry.id);

        h.monitor.set_online(true);
        h.coordinator.reconcile().await.unwrap();

        assert!(h.store.queued_items().await.unwrap().is_empty());
        let stored = h.store.get_entry(entry.id.unwrap()).await.unwrap().unwrap();
        assert!(stored.synced);
        assert_eq!(stored.remote_id.unwrap().as_str(), "65f0lviv");
    }
}
