use crate::application::ports::{PositionSource, ReachabilityProbe, ReverseGeocoder};
use crate::application::services::{
    EntryRepository, LocationService, ReconcileSubscription, SyncCoordinator,
};
use crate::domain::entities::ReconcileOutcome;
use crate::domain::value_objects::Coordinates;
use crate::infrastructure::connectivity::{ConnectivityMonitor, HttpReachabilityProbe};
use crate::infrastructure::database::ConnectionPool;
use crate::infrastructure::geocoding::{NominatimGeocoder, StaticPositionSource};
use crate::infrastructure::offline::{OfflineReindexJob, OfflineReindexReport, SqliteLocalStore};
use crate::infrastructure::remote::HttpRemoteEntryClient;
use crate::shared::config::AppConfig;
use crate::shared::error::AppError;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Collaborators wired from one `AppConfig`.
pub struct AppState {
    pub config: AppConfig,
    pub pool: ConnectionPool,
    pub store: Arc<SqliteLocalStore>,
    pub connectivity: Arc<ConnectivityMonitor>,
    pub coordinator: Arc<SyncCoordinator>,
    pub repository: EntryRepository,
    pub reindex_job: Arc<OfflineReindexJob>,
    probe: Arc<dyn ReachabilityProbe>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StartupReport {
    pub reindex: Option<OfflineReindexReport>,
    pub reconcile: Option<ReconcileOutcome>,
}

/// Background work started by [`AppState::watch`]. Dropping it stops everything.
pub struct BackgroundTasks {
    polling: Option<JoinHandle<()>>,
    _listener: ReconcileSubscription,
}

impl Drop for BackgroundTasks {
    fn drop(&mut self) {
        if let Some(polling) = self.polling.take() {
            polling.abort();
        }
    }
}

impl AppState {
    pub async fn build(config: AppConfig) -> Result<Self, AppError> {
        config.validate().map_err(AppError::ConfigurationError)?;

        let pool = ConnectionPool::from_config(&config.database).await?;
        pool.migrate().await?;
        let store = Arc::new(SqliteLocalStore::new(pool.clone()));

        let remote = Arc::new(HttpRemoteEntryClient::from_config(&config.remote)?);
        let probe: Arc<dyn ReachabilityProbe> = Arc::new(HttpReachabilityProbe::new(
            remote.base_url(),
            Duration::from_secs(config.connectivity.probe_timeout_secs),
        )?);
        let connectivity = if config.connectivity.force_offline {
            tracing::info!(target: "sync::connectivity", "offline mode forced by configuration");
            ConnectivityMonitor::pinned_offline()
        } else {
            ConnectivityMonitor::detect(probe.as_ref()).await
        };

        let coordinator = Arc::new(SyncCoordinator::new(
            store.clone(),
            remote,
            connectivity.clone(),
        ));
        let repository = EntryRepository::new(coordinator.clone());
        let reindex_job =
            OfflineReindexJob::with_gate(store.clone(), coordinator.reconcile_gate());

        Ok(Self {
            config,
            pool,
            store,
            connectivity,
            coordinator,
            repository,
            reindex_job,
            probe,
        })
    }

    /// Repairs the queue, then replays it, as enabled in the sync config.
    pub async fn start(&self) -> Result<StartupReport, AppError> {
        let reindex = self.repair_queue().await?;
        let reconcile = if self.config.sync.reconcile_on_startup {
            Some(self.coordinator.reconcile().await?)
        } else {
            None
        };
        Ok(StartupReport { reindex, reconcile })
    }

    /// Startup repair followed by exactly one reconcile, whatever
    /// `reconcile_on_startup` says.
    pub async fn sync_now(&self) -> Result<StartupReport, AppError> {
        let reindex = self.repair_queue().await?;
        let reconcile = Some(self.repository.sync_now().await?);
        Ok(StartupReport { reindex, reconcile })
    }

    async fn repair_queue(&self) -> Result<Option<OfflineReindexReport>, AppError> {
        if !self.config.sync.reindex_on_startup {
            return Ok(None);
        }
        self.reindex_job.run_guarded().await.map(Some)
    }

    /// Keeps probing connectivity and reconciles on every reconnect.
    pub fn watch(&self) -> BackgroundTasks {
        let listener = self.coordinator.spawn_reconcile_listener();
        let polling = if self.config.connectivity.force_offline {
            None
        } else {
            Some(self.connectivity.spawn_polling(
                self.probe.clone(),
                Duration::from_secs(self.config.connectivity.probe_interval_secs),
            ))
        };
        BackgroundTasks {
            polling,
            _listener: listener,
        }
    }

    pub fn location_service(
        &self,
        position: Option<Coordinates>,
    ) -> Result<LocationService, AppError> {
        let positions: Arc<dyn PositionSource> = Arc::new(StaticPositionSource::new(position));
        let geocoder = NominatimGeocoder::from_config(&self.config.location)?
            .map(|geocoder| Arc::new(geocoder) as Arc<dyn ReverseGeocoder>);
        Ok(LocationService::new(
            positions,
            geocoder,
            Duration::from_secs(self.config.location.acquisition_timeout_secs),
        ))
    }

    pub async fn shutdown(&self) {
        self.pool.close().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{ConnectivitySource, SyncQueueCollection};
    use crate::domain::entities::EntryDraft;
    use httpmock::Method::{HEAD, POST};
    use httpmock::MockServer;
    use serde_json::json;

    fn offline_config(dir: &tempfile::TempDir) -> AppConfig {
        let mut config = AppConfig::default();
        config.database.url = format!("sqlite://{}", dir.path().join("journal.db").display());
        config.connectivity.force_offline = true;
        config.location.geocoder_url = None;
        config
    }

    #[tokio::test]
    async fn offline_state_persists_entries_across_restarts() {
        let dir = tempfile::tempdir().unwrap();

        let state = AppState::build(offline_config(&dir)).await.unwrap();
        assert!(!state.connectivity.is_online());
        state
            .repository
            .submit(EntryDraft::new("Lviv", "Great coffee", "Lviv, UA"))
            .await
            .unwrap();
        state.shutdown().await;

        let state = AppState::build(offline_config(&dir)).await.unwrap();
        let report = state.start().await.unwrap();
        assert_eq!(report.reconcile, Some(ReconcileOutcome::Offline));
        let reindex = report.reindex.unwrap();
        assert!(!reindex.repaired_anything());
        assert_eq!(reindex.pending_queue_count, 1);
        assert_eq!(state.store.queued_items().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn sync_now_runs_a_single_reconcile() {
        let dir = tempfile::tempdir().unwrap();
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(HEAD).path("/api");
                then.status(200);
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/api/entries");
                then.status(503);
            })
            .await;
        let sync = server
            .mock_async(|when, then| {
                when.method(POST).path("/api/sync");
                then.status(200)
                    .json_body(json!([{"_id": "r-1", "title": "Lviv"}]));
            })
            .await;

        let mut config = offline_config(&dir);
        config.connectivity.force_offline = false;
        config.sync.reconcile_on_startup = true;
        config.remote.base_url = server.url("/api");
        let state = AppState::build(config).await.unwrap();
        assert!(state.connectivity.is_online());

        let entry = state
            .repository
            .submit(EntryDraft::new("Lviv", "", ""))
            .await
            .unwrap();
        assert!(!entry.synced);

        let report = state.sync_now().await.unwrap();

        assert_eq!(
            report.reconcile,
            Some(ReconcileOutcome::Completed {
                synced: 1,
                remaining: 0
            })
        );
        sync.assert_hits_async(1).await;
        assert!(state.store.queued_items().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn invalid_config_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = offline_config(&dir);
        config.remote.base_url = "not a url".into();

        let err = AppState::build(config).await.err().unwrap();
        assert!(matches!(err, AppError::ConfigurationError(_)));
    }

    #[tokio::test]
    async fn location_service_without_position_needs_manual_entry() {
        let dir = tempfile::tempdir().unwrap();
        let state = AppState::build(offline_config(&dir)).await.unwrap();

        let resolution = state.location_service(None).unwrap().resolve().await;
        assert!(resolution.location_text().is_none());
    }
}
