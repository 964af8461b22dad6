//! Import functionality
//!
//! Reads an export bundle back: either a ZIP produced by the exporter or a bare
//! `WineTastingData.json` with a sibling `exported_images/` folder. Photos are copied into
//! the album and the caller then applies a [`MergePolicy`] to the record store.

pub mod merge;
pub mod reader;

use crate::models::WineRecord;
use crate::photos::PhotoImportStats;
use crate::storage::StorageError;

/// Result of reading an import source
#[derive(Debug, Clone)]
pub struct ImportResult {
    /// Parsed records with photo fields pointing into the album (or cleared)
    pub records: Vec<WineRecord>,
    /// Folder the photos were read from
    pub images_dir: String,
    /// Transient extraction directory, set when the source was an archive
    pub extraction_dir: Option<String>,
    pub photos: PhotoImportStats,
}

/// Error during import
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("Storage permission denied")]
    PermissionDenied,
    #[error("Archive is corrupt: {0}")]
    ArchiveCorrupt(String),
    #[error("Malformed data: {0}")]
    MalformedData(String),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl ImportError {
    /// Get a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            ImportError::PermissionDenied => "No permission to access file storage.".to_string(),
            ImportError::ArchiveCorrupt(_) => "The ZIP archive could not be unpacked.".to_string(),
            ImportError::MalformedData(_) => {
                "The file does not contain wine-tasting records in the expected format."
                    .to_string()
            }
            ImportError::Storage(_) => "The file could not be read or imported.".to_string(),
        }
    }
}

pub use merge::{MergeOutcome, MergePolicy};
pub use reader::{ArchiveReader, is_archive_path, parse_records};
