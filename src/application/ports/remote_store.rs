use crate::domain::entities::{Entry, RemoteEntry};
use crate::shared::error::AppError;
use async_trait::async_trait;

/// Client of the remote entry service. One round trip per call, no retries;
/// every transport or status failure surfaces as `AppError::Network`.
#[async_trait]
pub trait RemoteEntryApi: Send + Sync {
    async fn create_entry(&self, entry: &Entry) -> Result<RemoteEntry, AppError>;
    async fn list_entries(&self) -> Result<Vec<RemoteEntry>, AppError>;
    /// Submits a batch of entries. The response is positional: slot `i`
    /// acknowledges `entries[i]`, `None` means the service did not store it.
    /// A response shorter than the batch leaves the tail unacknowledged.
    async fn batch_sync(&self, entries: &[Entry]) -> Result<Vec<Option<RemoteEntry>>, AppError>;
}
