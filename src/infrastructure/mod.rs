pub mod connectivity;
pub mod database;
pub mod geocoding;
pub mod offline;
pub mod photo;
pub mod remote;
