mod mappers;
mod queries;
pub mod reindex_job;
mod rows;
pub mod sqlite_store;

pub use reindex_job::{OfflineReindexJob, OfflineReindexReport};
pub use sqlite_store::SqliteLocalStore;
