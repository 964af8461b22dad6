//! Application-private photo storage
//!
//! Photos attached to records live in a single album directory under the data
//! directory. Stored file names carry the album name and a millisecond timestamp.

use crate::storage::{StorageBackend, StorageError};
use crate::timestamp;
use tracing::{info, warn};

/// Default album name, also used as the album directory name
pub const DEFAULT_ALBUM_NAME: &str = "winetastenote";

/// Photo album rooted in the storage backend
#[derive(Debug, Clone)]
pub struct PhotoAlbum {
    name: String,
}

impl PhotoAlbum {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Directory of the album, relative to the storage root
    pub fn dir(&self) -> &str {
        &self.name
    }

    async fn ensure_dir<B: StorageBackend>(&self, storage: &B) -> Result<(), StorageError> {
        if !storage.dir_exists(self.dir()).await? {
            storage.create_dir(self.dir()).await?;
            info!("Created album directory {}", storage.absolute_path(self.dir()));
        }
        Ok(())
    }

    /// Store a new photo and return its absolute path.
    ///
    /// The file is named `<album>_<timestamp><ext>`, keeping the extension of
    /// `original_name` or falling back to `.jpg`.
    pub async fn save_photo<B: StorageBackend>(
        &self,
        storage: &B,
        original_name: &str,
        content: &[u8],
    ) -> Result<String, StorageError> {
        self.ensure_dir(storage).await?;

        let file_name = format!(
            "{}_{}{}",
            self.name,
            timestamp::next_millis(),
            super::file_extension(original_name)
        );
        let path = format!("{}/{}", self.dir(), file_name);
        storage.write_file(&path, content).await?;

        let absolute = storage.absolute_path(&path);
        info!("Saved photo to {}", absolute);
        Ok(absolute)
    }

    /// Copy an extracted photo into the album as `<album>_<timestamp>_<basename>`
    /// and return its absolute path.
    pub async fn import_photo<B: StorageBackend>(
        &self,
        storage: &B,
        source: &str,
        basename: &str,
    ) -> Result<String, StorageError> {
        self.ensure_dir(storage).await?;

        let file_name = format!("{}_{}_{}", self.name, timestamp::next_millis(), basename);
        let path = format!("{}/{}", self.dir(), file_name);
        storage.copy_file(source, &path).await?;

        Ok(storage.absolute_path(&path))
    }

    /// Remove a photo; an empty path or an already missing file is not an error
    pub async fn delete_photo<B: StorageBackend>(&self, storage: &B, path: &str) {
        if path.is_empty() {
            return;
        }
        match storage.delete_file(path).await {
            Ok(()) => info!("Deleted photo {}", path),
            Err(StorageError::FileNotFound(_)) => {}
            Err(e) => warn!("Failed to delete photo {}: {}", path, e),
        }
    }
}

impl Default for PhotoAlbum {
    fn default() -> Self {
        Self::new(DEFAULT_ALBUM_NAME)
    }
}
