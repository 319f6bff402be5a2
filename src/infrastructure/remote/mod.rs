pub mod dto;
pub mod error;
pub mod http_client;

pub use error::RemoteStoreError;
pub use http_client::HttpRemoteEntryClient;
