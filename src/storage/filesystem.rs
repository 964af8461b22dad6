//! File system storage backend
//!
//! Implements StorageBackend for the native file system, rooted at the application data
//! directory.
//!
//! ## Security
//!
//! Paths containing `..` components are rejected. Absolute paths are accepted only when
//! they point inside the base directory, and all resolved paths are verified to remain
//! within it.

use super::{StorageBackend, StorageError};
use async_trait::async_trait;
use std::path::{Component, Path, PathBuf};
use tokio::fs;
use tracing::debug;

/// File system storage backend
#[derive(Debug, Clone)]
pub struct FileSystemStorageBackend {
    base_path: PathBuf,
}

impl FileSystemStorageBackend {
    /// Create a new file system storage backend
    ///
    /// # Arguments
    ///
    /// * `base_path` - Base directory path for all file operations
    ///
    /// # Example
    ///
    /// ```rust
    /// use winenote::storage::filesystem::FileSystemStorageBackend;
    ///
    /// let backend = FileSystemStorageBackend::new("/data/winenote");
    /// ```
    pub fn new(base_path: impl AsRef<Path>) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
        }
    }

    /// Base directory of this backend
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn base_canonical(&self) -> PathBuf {
        self.base_path
            .canonicalize()
            .unwrap_or_else(|_| self.base_path.clone())
    }

    /// Strip the base directory from an absolute path
    fn relative_part(&self, candidate: &Path) -> Result<PathBuf, StorageError> {
        if let Ok(rest) = candidate.strip_prefix(&self.base_path) {
            return Ok(rest.to_path_buf());
        }
        if let Ok(rest) = candidate.strip_prefix(self.base_canonical()) {
            return Ok(rest.to_path_buf());
        }
        Err(StorageError::PermissionDenied(format!(
            "Path is outside the data directory: {}",
            candidate.display()
        )))
    }

    /// Resolve a path relative to the base path with security checks.
    ///
    /// - Rejects paths containing ".." components
    /// - Accepts absolute paths only inside base_path
    /// - Verifies the resolved path stays within base_path
    fn resolve_path(&self, path: &str) -> Result<PathBuf, StorageError> {
        let candidate = Path::new(path);

        if candidate
            .components()
            .any(|c| matches!(c, Component::ParentDir))
        {
            return Err(StorageError::PermissionDenied(
                "Path traversal (..) not allowed".to_string(),
            ));
        }

        let relative = if candidate.is_absolute() {
            self.relative_part(candidate)?
        } else {
            candidate.to_path_buf()
        };

        let full = self.base_path.join(relative);
        let base_canonical = self.base_canonical();

        // For existing paths, canonicalize and verify containment
        if full.exists() {
            let canonical = full
                .canonicalize()
                .map_err(|e| StorageError::IoError(format!("Failed to resolve path: {}", e)))?;

            if !canonical.starts_with(&base_canonical) {
                return Err(StorageError::PermissionDenied(
                    "Path escapes base directory".to_string(),
                ));
            }

            return Ok(canonical);
        }

        // For non-existing paths, check that the parent is valid
        if let Some(parent) = full.parent()
            && parent.exists()
        {
            let parent_canonical = parent.canonicalize().map_err(|e| {
                StorageError::IoError(format!("Failed to resolve parent path: {}", e))
            })?;

            if !parent_canonical.starts_with(&base_canonical) {
                return Err(StorageError::PermissionDenied(
                    "Path escapes base directory".to_string(),
                ));
            }
        }

        Ok(full)
    }
}

#[async_trait(?Send)]
impl StorageBackend for FileSystemStorageBackend {
    async fn read_file(&self, path: &str) -> Result<Vec<u8>, StorageError> {
        let full_path = self.resolve_path(path)?;

        fs::read(&full_path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                StorageError::FileNotFound(path.to_string())
            } else {
                StorageError::IoError(format!("Failed to read file {}: {}", path, e))
            }
        })
    }

    async fn write_file(&self, path: &str, content: &[u8]) -> Result<(), StorageError> {
        let full_path = self.resolve_path(path)?;

        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).await.map_err(|e| {
                StorageError::IoError(format!("Failed to create directory for {}: {}", path, e))
            })?;
        }

        fs::write(&full_path, content)
            .await
            .map_err(|e| StorageError::IoError(format!("Failed to write file {}: {}", path, e)))
    }

    async fn file_exists(&self, path: &str) -> Result<bool, StorageError> {
        let full_path = self.resolve_path(path)?;

        match fs::metadata(&full_path).await {
            Ok(metadata) => Ok(metadata.is_file()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(StorageError::IoError(format!(
                "Failed to check file existence {}: {}",
                path, e
            ))),
        }
    }

    async fn delete_file(&self, path: &str) -> Result<(), StorageError> {
        let full_path = self.resolve_path(path)?;

        fs::remove_file(&full_path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                StorageError::FileNotFound(path.to_string())
            } else {
                StorageError::IoError(format!("Failed to delete file {}: {}", path, e))
            }
        })
    }

    async fn create_dir(&self, path: &str) -> Result<(), StorageError> {
        let full_path = self.resolve_path(path)?;

        fs::create_dir_all(&full_path).await.map_err(|e| {
            StorageError::IoError(format!("Failed to create directory {}: {}", path, e))
        })
    }

    async fn dir_exists(&self, path: &str) -> Result<bool, StorageError> {
        let full_path = self.resolve_path(path)?;

        match fs::metadata(&full_path).await {
            Ok(metadata) => Ok(metadata.is_dir()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(StorageError::IoError(format!(
                "Failed to check directory existence {}: {}",
                path, e
            ))),
        }
    }

    async fn copy_file(&self, from: &str, to: &str) -> Result<(), StorageError> {
        let source = self.resolve_path(from)?;
        let target = self.resolve_path(to)?;

        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).await.map_err(|e| {
                StorageError::IoError(format!("Failed to create directory for {}: {}", to, e))
            })?;
        }

        let copied = fs::copy(&source, &target).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                StorageError::FileNotFound(from.to_string())
            } else {
                StorageError::IoError(format!("Failed to copy {} to {}: {}", from, to, e))
            }
        })?;

        debug!("Copied {} bytes from {} to {}", copied, from, to);
        Ok(())
    }

    async fn delete_dir(&self, path: &str) -> Result<(), StorageError> {
        let full_path = self.resolve_path(path)?;

        fs::remove_dir_all(&full_path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                StorageError::DirectoryNotFound(path.to_string())
            } else {
                StorageError::IoError(format!("Failed to delete directory {}: {}", path, e))
            }
        })
    }

    fn absolute_path(&self, path: &str) -> String {
        let candidate = Path::new(path);
        if candidate.is_absolute() {
            return path.to_string();
        }
        self.base_path.join(candidate).display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_path_traversal_blocked() {
        let temp = TempDir::new().unwrap();
        let backend = FileSystemStorageBackend::new(temp.path());

        let result = backend.resolve_path("../etc/passwd");
        assert!(matches!(result, Err(StorageError::PermissionDenied(_))));

        let result = backend.resolve_path("/foo/../../../etc/passwd");
        assert!(matches!(result, Err(StorageError::PermissionDenied(_))));

        let result = backend.resolve_path("valid/path/file.txt");
        assert!(result.is_ok());
    }

    #[test]
    fn test_absolute_paths_inside_base_allowed() {
        let temp = TempDir::new().unwrap();
        let backend = FileSystemStorageBackend::new(temp.path());

        let inside = backend.absolute_path("winetastenote/photo.jpg");
        assert!(Path::new(&inside).is_absolute());
        assert!(backend.resolve_path(&inside).is_ok());

        let result = backend.resolve_path("/etc/passwd");
        assert!(matches!(result, Err(StorageError::PermissionDenied(_))));
    }

    #[test]
    fn test_dotted_file_names_allowed() {
        let temp = TempDir::new().unwrap();
        let backend = FileSystemStorageBackend::new(temp.path());

        assert!(backend.resolve_path("exported_images/label..v2.png").is_ok());
    }
}
