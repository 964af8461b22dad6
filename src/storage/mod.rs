//! Storage backend abstraction
//!
//! Defines the StorageBackend trait used by the record store, the photo album and the
//! export/import routines. The native implementation is FileSystemStorageBackend, rooted
//! at the application data directory.

use async_trait::async_trait;

/// Error type for storage operations
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("File not found: {0}")]
    FileNotFound(String),
    #[error("Directory not found: {0}")]
    DirectoryNotFound(String),
    #[error("IO error: {0}")]
    IoError(String),
    #[error("Serialization error: {0}")]
    SerializationError(String),
    #[error("Permission denied: {0}")]
    PermissionDenied(String),
}

/// Trait for storage backends
///
/// Paths are strings relative to the backend root. Backends that know an absolute
/// location for a path expose it through [`StorageBackend::absolute_path`]; that absolute
/// form is accepted back by every other method.
#[async_trait(?Send)]
pub trait StorageBackend: Send + Sync {
    /// Read a file from storage
    async fn read_file(&self, path: &str) -> Result<Vec<u8>, StorageError>;

    /// Write a file to storage, creating parent directories as needed
    async fn write_file(&self, path: &str, content: &[u8]) -> Result<(), StorageError>;

    /// Check if a file exists
    async fn file_exists(&self, path: &str) -> Result<bool, StorageError>;

    /// Delete a file
    async fn delete_file(&self, path: &str) -> Result<(), StorageError>;

    /// Create a directory (and any missing parents)
    async fn create_dir(&self, path: &str) -> Result<(), StorageError>;

    /// Check if a directory exists
    async fn dir_exists(&self, path: &str) -> Result<bool, StorageError>;

    /// Copy a file, overwriting the destination
    async fn copy_file(&self, from: &str, to: &str) -> Result<(), StorageError>;

    /// Delete a directory and everything below it
    async fn delete_dir(&self, path: &str) -> Result<(), StorageError>;

    /// Absolute form of a path, used when a path is stored inside a record
    fn absolute_path(&self, path: &str) -> String {
        path.to_string()
    }

    /// Read a UTF-8 text file
    async fn read_text(&self, path: &str) -> Result<String, StorageError> {
        let bytes = self.read_file(path).await?;
        String::from_utf8(bytes)
            .map_err(|e| StorageError::SerializationError(format!("{} is not UTF-8: {}", path, e)))
    }
}

// Storage backend implementations
#[cfg(feature = "native-fs")]
pub mod filesystem;
