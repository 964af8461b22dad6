//! Winenote - wine-tasting notes with portable export bundles
//!
//! Provides:
//! - An ordered record store persisted as one JSON file
//! - A photo album for the four photos a record can carry
//! - Export of all records and their photos into a ZIP bundle
//! - Import of such a bundle (or a bare JSON file) with replace/append merging
//! - Deferred cleanup of temporary export and import directories

pub mod archive;
pub mod cleanup;
pub mod config;
pub mod export;
pub mod import;
pub mod model;
pub mod models;
pub mod photos;
pub mod platform;
pub mod storage;
pub mod timestamp;
#[cfg(feature = "native-fs")]
pub mod transfer;

// Re-export commonly used types
#[cfg(feature = "native-fs")]
pub use storage::filesystem::FileSystemStorageBackend;
pub use storage::{StorageBackend, StorageError};

pub use archive::{ArchiveEntry, ArchiveError, EntryData};
pub use cleanup::{CleanupOutcome, CleanupPolicy};
pub use config::{AppConfig, ConfigError};
pub use export::{ArchiveWriter, ExportError, ExportResult};
pub use import::{ArchiveReader, ImportError, ImportResult, MergeOutcome, MergePolicy};
pub use model::{RecordStore, StoreError};
pub use models::{GrapeVariety, PhotoKind, RecordForm, WineRecord, parse_grape_varieties};
pub use photos::PhotoAlbum;
pub use platform::{AlwaysGranted, NoShare, PermissionGate, ShareError, ShareSink};
#[cfg(feature = "native-fs")]
pub use transfer::{ExportSummary, ImportSummary, PendingImport, TransferService};
