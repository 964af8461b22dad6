//! Archive writer
//!
//! Copies the referenced photos into `<export_dir>/exported_images`, writes the rewritten
//! records as pretty JSON and packs both into the ZIP. Missing photos are counted, not
//! fatal; only directory creation, the JSON write and the archive write abort an export.

use super::{
    ARCHIVE_FILE_NAME, DATA_FILE_NAME, ExportError, ExportResult, README_FILE_NAME, readme,
};
use crate::archive::{self, EntryData};
use crate::models::WineRecord;
use crate::photos::{self, EXPORTED_IMAGES_DIR};
use crate::storage::StorageBackend;
use tracing::{debug, info, warn};

/// Writes one export bundle into a directory
#[derive(Debug, Clone)]
pub struct ArchiveWriter {
    export_dir: String,
    timestamp: i64,
}

impl ArchiveWriter {
    /// Writer for `export_dir` (relative to the storage root). `timestamp` is embedded in
    /// every exported photo name.
    pub fn new(export_dir: impl Into<String>, timestamp: i64) -> Self {
        Self {
            export_dir: export_dir.into(),
            timestamp,
        }
    }

    pub fn export_dir(&self) -> &str {
        &self.export_dir
    }

    fn images_dir(&self) -> String {
        format!("{}/{}", self.export_dir, EXPORTED_IMAGES_DIR)
    }

    /// Write the bundle for `records`
    pub async fn write<B: StorageBackend>(
        &self,
        storage: &B,
        records: &[WineRecord],
    ) -> Result<ExportResult, ExportError> {
        let plan = photos::plan_export(records, self.timestamp);
        let images_dir = self.images_dir();

        for dir in [self.export_dir.as_str(), images_dir.as_str()] {
            storage
                .create_dir(dir)
                .await
                .map_err(|source| ExportError::DirectoryCreate {
                    path: dir.to_string(),
                    source,
                })?;
        }

        let total_images = plan.copies.len();
        let mut failed_images = 0;
        let mut copied = Vec::with_capacity(total_images);

        for copy in &plan.copies {
            let exists = storage.file_exists(&copy.source).await.unwrap_or_else(|e| {
                warn!("Cannot check photo {}: {}", copy.source, e);
                false
            });
            if !exists {
                warn!("Photo not found: {}", copy.source);
                failed_images += 1;
                continue;
            }

            let target = format!("{}/{}", images_dir, copy.export_name);
            match storage.copy_file(&copy.source, &target).await {
                Ok(()) => {
                    debug!("Copied {}", copy.export_name);
                    copied.push(copy.export_name.clone());
                }
                Err(e) => {
                    warn!("Failed to copy photo {}: {}", copy.source, e);
                    failed_images += 1;
                }
            }
        }

        if failed_images > 0 {
            warn!(
                "Could not copy {} of {} photos",
                failed_images, total_images
            );
        }

        let json_path = format!("{}/{}", self.export_dir, DATA_FILE_NAME);
        let json = serde_json::to_string_pretty(&plan.records).map_err(|e| {
            ExportError::JsonWrite {
                path: json_path.clone(),
                reason: e.to_string(),
            }
        })?;
        storage
            .write_file(&json_path, json.as_bytes())
            .await
            .map_err(|e| ExportError::JsonWrite {
                path: json_path.clone(),
                reason: e.to_string(),
            })?;

        let archive_path = self.write_archive(storage, json, &copied).await?;

        let readme_path = format!("{}/{}", self.export_dir, README_FILE_NAME);
        let readme_path = match storage
            .write_file(
                &readme_path,
                readme::render(total_images, failed_images).as_bytes(),
            )
            .await
        {
            Ok(()) => Some(storage.absolute_path(&readme_path)),
            Err(e) => {
                warn!("Failed to write {}: {}", readme_path, e);
                None
            }
        };

        info!(
            "Exported {} records with {} photos to {}",
            records.len(),
            copied.len(),
            archive_path
        );

        Ok(ExportResult {
            archive_path,
            export_dir: self.export_dir.clone(),
            readme_path,
            total_images,
            failed_images,
        })
    }

    async fn write_archive<B: StorageBackend>(
        &self,
        storage: &B,
        json: String,
        copied: &[String],
    ) -> Result<String, ExportError> {
        let images_dir = self.images_dir();
        let mut entries = vec![
            (DATA_FILE_NAME.to_string(), EntryData::Text(json)),
            (format!("{}/", EXPORTED_IMAGES_DIR), EntryData::Text(String::new())),
        ];

        for name in copied {
            let path = format!("{}/{}", images_dir, name);
            match storage.read_file(&path).await {
                Ok(content) => entries.push((
                    format!("{}/{}", EXPORTED_IMAGES_DIR, name),
                    archive::encode_binary(&content),
                )),
                Err(e) => warn!("Skipping {} in archive: {}", name, e),
            }
        }

        let bytes = archive::pack(&entries)?;
        let archive_path = format!("{}/{}", self.export_dir, ARCHIVE_FILE_NAME);
        storage
            .write_file(&archive_path, &bytes)
            .await
            .map_err(|e| ExportError::ArchiveWrite {
                path: archive_path.clone(),
                reason: e.to_string(),
            })?;

        Ok(storage.absolute_path(&archive_path))
    }
}
