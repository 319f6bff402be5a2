pub mod ports;
pub mod services;

pub use services::{EntryRepository, LocationService, SyncCoordinator};
