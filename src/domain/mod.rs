pub mod entities;
pub mod value_objects;

pub use entities::{Entry, EntryDraft, RemoteEntry, SyncQueueItem};
pub use value_objects::{EntryId, RemoteEntryId, SyncQueueId};
