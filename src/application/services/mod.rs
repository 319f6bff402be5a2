pub mod entry_repository;
pub mod location_service;
pub mod sync_coordinator;

pub use entry_repository::EntryRepository;
pub use location_service::{LocationResolution, LocationService};
pub use sync_coordinator::{ReconcileSubscription, SyncCoordinator, LAST_RECONCILED_AT_KEY};
