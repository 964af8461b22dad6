//! Export functionality
//!
//! Packs the record list and every photo it references into a ZIP bundle:
//!
//! ```text
//! WineTastingData.json
//! exported_images/
//!   bottle_<idx>_<ts>.<ext>
//!   label_<idx>_<ts>.<ext>
//!   backlabel_<idx>_<ts>.<ext>
//!   plaque_<idx>_<ts>.<ext>
//! ```
//!
//! A `README.html` with instructions is written next to the archive.

pub mod readme;
pub mod writer;

use crate::archive::ArchiveError;
use crate::storage::StorageError;

/// Name of the JSON payload, both on disk and inside the archive
pub const DATA_FILE_NAME: &str = "WineTastingData.json";
/// Name of the archive inside the export directory
pub const ARCHIVE_FILE_NAME: &str = "WineTastingExport.zip";
/// Name of the instructions document next to the archive
pub const README_FILE_NAME: &str = "README.html";

/// Result of an export operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportResult {
    /// Absolute path of the archive
    pub archive_path: String,
    /// Export directory, relative to the storage root
    pub export_dir: String,
    /// Instructions document, if it could be written
    pub readme_path: Option<String>,
    /// Photos referenced by the exported records
    pub total_images: usize,
    /// Referenced photos that were missing or could not be copied
    pub failed_images: usize,
}

/// Error during export
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("Storage permission denied")]
    PermissionDenied,
    #[error("No records to export")]
    EmptyInput,
    #[error("Failed to create export directory {path}: {source}")]
    DirectoryCreate {
        path: String,
        #[source]
        source: StorageError,
    },
    #[error("Failed to write {path}: {reason}")]
    JsonWrite { path: String, reason: String },
    #[error("Failed to create archive {path}: {reason}")]
    ArchiveWrite { path: String, reason: String },
}

impl From<ArchiveError> for ExportError {
    fn from(err: ArchiveError) -> Self {
        ExportError::ArchiveWrite {
            path: ARCHIVE_FILE_NAME.to_string(),
            reason: err.to_string(),
        }
    }
}

impl ExportError {
    /// Get a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            ExportError::PermissionDenied => "No permission to access file storage.".to_string(),
            ExportError::EmptyInput => "There are no records to export.".to_string(),
            ExportError::DirectoryCreate { .. }
            | ExportError::JsonWrite { .. }
            | ExportError::ArchiveWrite { .. } => {
                "Export failed. The data could not be written.".to_string()
            }
        }
    }
}

pub use writer::ArchiveWriter;
