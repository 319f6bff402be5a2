pub mod connectivity;
pub mod local_store;
pub mod location;
pub mod remote_store;

pub use connectivity::{ConnectivityEvent, ConnectivitySource, ConnectivityState, ReachabilityProbe};
pub use local_store::{EntryCollection, LocalStore, SettingsCollection, SyncQueueCollection};
pub use location::{PositionSource, ReverseGeocoder};
pub use remote_store::RemoteEntryApi;
