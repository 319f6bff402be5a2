pub mod coordinates;
pub mod entry_id;
pub mod remote_entry_id;
pub mod sync_operation_type;
pub mod sync_queue_id;

pub use coordinates::Coordinates;
pub use entry_id::EntryId;
pub use remote_entry_id::RemoteEntryId;
pub use sync_operation_type::SyncOperationType;
pub use sync_queue_id::SyncQueueId;
