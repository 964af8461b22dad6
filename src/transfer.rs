//! Export and import workflows
//!
//! Ties the permission gate, the archive writer and reader, the share sink, the merge
//! policy and the deferred cleanup together. The record store is passed in by reference,
//! so every mutation still goes through its add/replace/append operations.

use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::cleanup::{self, CleanupOutcome, CleanupPolicy};
use crate::config::AppConfig;
use crate::export::{ArchiveWriter, ExportError, ExportResult};
use crate::import::{ArchiveReader, ImportError, ImportResult, MergeOutcome, MergePolicy};
use crate::model::{RecordStore, StoreError};
use crate::photos::PhotoAlbum;
use crate::platform::{PermissionGate, ShareError, ShareSink};
use crate::storage::{StorageBackend, StorageError};
use crate::timestamp;

const SHARE_TITLE: &str = "Export of wine-tasting notes";

/// Outcome of a completed export
#[derive(Debug)]
pub struct ExportSummary {
    pub result: ExportResult,
    /// Whether the share sink accepted the archive
    pub shared: bool,
    /// Scheduled removal of the export directory, if any
    pub cleanup: Option<JoinHandle<CleanupOutcome>>,
}

impl ExportSummary {
    /// User-facing success message
    pub fn message(&self) -> String {
        let mut message = String::from("Data exported successfully.");
        if self.result.failed_images > 0 {
            message.push_str(&format!(
                "\n\nCould not copy some photos ({} of {}).",
                self.result.failed_images, self.result.total_images
            ));
        }
        message.push_str("\n\nCreated a ZIP archive with JSON and photos.");
        if !self.shared {
            message.push_str(&format!(
                "\n\nThe archive is saved at:\n{}",
                self.result.archive_path
            ));
        }
        message
    }
}

/// Records read from an import source, waiting for a merge decision
#[derive(Debug)]
pub struct PendingImport {
    pub result: ImportResult,
}

impl PendingImport {
    pub fn len(&self) -> usize {
        self.result.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.result.records.is_empty()
    }

    /// Prompt shown when asking for a merge policy
    pub fn prompt(&self) -> String {
        format!("Found {} records. How should they be imported?", self.len())
    }
}

/// Outcome of a completed import
#[derive(Debug)]
pub struct ImportSummary {
    pub outcome: MergeOutcome,
    /// Scheduled removal of the extraction directory, if any
    pub cleanup: Option<JoinHandle<CleanupOutcome>>,
}

impl ImportSummary {
    /// User-facing success message
    pub fn message(&self) -> String {
        match self.outcome.policy {
            MergePolicy::Replace => format!(
                "Data imported, {} records loaded.",
                self.outcome.imported
            ),
            MergePolicy::Append => format!(
                "Data added, {} records in total.",
                self.outcome.total
            ),
            MergePolicy::Cancel => "Import cancelled.".to_string(),
        }
    }
}

/// Export/import workflow over a record store
pub struct TransferService<G: PermissionGate, S: ShareSink> {
    config: AppConfig,
    album: PhotoAlbum,
    gate: G,
    sink: S,
    cleanup_exports: bool,
}

impl<G: PermissionGate, S: ShareSink> TransferService<G, S> {
    pub fn new(config: AppConfig, gate: G, sink: S) -> Self {
        let album = PhotoAlbum::new(config.album_name.clone());
        Self {
            config,
            album,
            gate,
            sink,
            cleanup_exports: true,
        }
    }

    /// Leave export directories in place instead of scheduling their removal
    pub fn keep_exports(mut self) -> Self {
        self.cleanup_exports = false;
        self
    }

    pub fn album(&self) -> &PhotoAlbum {
        &self.album
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    fn schedule_cleanup<B: StorageBackend>(
        storage: &B,
        dir: &str,
        policy: CleanupPolicy,
    ) -> JoinHandle<CleanupOutcome> {
        cleanup::schedule(storage.absolute_path(dir), policy)
    }

    /// Export every record of `store` into a fresh bundle and share it
    pub async fn export_all<B: StorageBackend>(
        &self,
        store: &RecordStore<B>,
    ) -> Result<ExportSummary, ExportError> {
        if !self.gate.request_storage_permission().await {
            return Err(ExportError::PermissionDenied);
        }
        if store.is_empty() {
            return Err(ExportError::EmptyInput);
        }

        let stamp = timestamp::next_millis();
        let export_dir = format!("{}_{}", self.config.export_prefix, stamp);
        let result = ArchiveWriter::new(&export_dir, stamp)
            .write(store.storage(), store.list_records())
            .await?;

        let shared = match self.sink.share(&result.archive_path, SHARE_TITLE).await {
            Ok(()) => true,
            Err(ShareError::Unavailable) => {
                info!("Sharing unavailable, archive left at {}", result.archive_path);
                false
            }
            Err(e) => {
                warn!("Failed to share {}: {}", result.archive_path, e);
                false
            }
        };

        let cleanup = self.cleanup_exports.then(|| {
            Self::schedule_cleanup(store.storage(), &export_dir, self.config.export_cleanup())
        });

        Ok(ExportSummary {
            result,
            shared,
            cleanup,
        })
    }

    /// Read an archive or bare JSON file and restore its photos.
    ///
    /// The store is not touched; pass the result to [`TransferService::complete_import`].
    pub async fn prepare_import<B: StorageBackend>(
        &self,
        store: &RecordStore<B>,
        source: &str,
    ) -> Result<PendingImport, ImportError> {
        if !self.gate.request_storage_permission().await {
            return Err(ImportError::PermissionDenied);
        }

        let extraction_dir = format!(
            "{}_{}",
            self.config.import_prefix,
            timestamp::next_millis()
        );
        let reader = ArchiveReader::new(self.album.clone());

        match reader.read(store.storage(), source, &extraction_dir).await {
            Ok(result) => Ok(PendingImport { result }),
            Err(e) => {
                warn!("Import of {} failed: {}", source, e);
                if crate::import::is_archive_path(source) {
                    match store.storage().delete_dir(&extraction_dir).await {
                        Ok(()) => info!("Removed {} after failed import", extraction_dir),
                        Err(StorageError::DirectoryNotFound(_)) => {}
                        Err(cleanup_err) => {
                            warn!("Failed to remove {}: {}", extraction_dir, cleanup_err)
                        }
                    }
                }
                Err(e)
            }
        }
    }

    /// Apply `policy` to `store` and schedule removal of the extraction directory
    pub async fn complete_import<B: StorageBackend>(
        &self,
        store: &mut RecordStore<B>,
        pending: PendingImport,
        policy: MergePolicy,
    ) -> Result<ImportSummary, StoreError> {
        let cleanup = pending.result.extraction_dir.as_deref().map(|dir| {
            Self::schedule_cleanup(store.storage(), dir, self.config.import_cleanup())
        });

        let outcome = policy.apply(store, pending.result.records).await?;

        Ok(ImportSummary { outcome, cleanup })
    }
}
