//! Record persistence
//!
//! Provides the record store, which loads and saves the wine records through a storage
//! backend.

pub mod store;

pub use store::{RECORDS_FILE_NAME, RecordStore, StoreError};
