//! Photo resolution for export and import
//!
//! On export, every non-empty photo field of a working copy of the records is renamed to
//! `exported_images/<kind>_<index>_<timestamp><ext>` and a copy list is produced; nothing
//! touches the disk. On import, fields pointing into `exported_images/` are materialized
//! into the photo album, or cleared when the file is missing.

pub mod album;

pub use album::{DEFAULT_ALBUM_NAME, PhotoAlbum};

use crate::models::{PhotoKind, WineRecord};
use crate::storage::StorageBackend;
use tracing::{debug, warn};

/// Folder holding photos inside an export, and prefix of exported photo fields
pub const EXPORTED_IMAGES_DIR: &str = "exported_images";

const EXPORTED_PREFIX: &str = "exported_images/";

/// A photo to copy into an export
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoCopy {
    pub kind: PhotoKind,
    pub record_index: usize,
    /// Path currently stored in the record
    pub source: String,
    /// File name inside `exported_images/`
    pub export_name: String,
}

/// Records rewritten for export plus the photos they reference
#[derive(Debug, Clone)]
pub struct ExportPlan {
    pub records: Vec<WineRecord>,
    pub copies: Vec<PhotoCopy>,
}

/// Extension of the last path segment including the dot, or `.jpg`
pub fn file_extension(path: &str) -> &str {
    let file_name = file_basename(path);
    match file_name.rfind('.') {
        Some(pos) => &file_name[pos..],
        None => ".jpg",
    }
}

/// Text after the last `/`
pub fn file_basename(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// `<kind>_<index>_<timestamp><ext>`
pub fn export_file_name(kind: PhotoKind, index: usize, timestamp: i64, source: &str) -> String {
    format!(
        "{}_{}_{}{}",
        kind.export_prefix(),
        index,
        timestamp,
        file_extension(source)
    )
}

/// Build the export copy of `records`; the originals are left untouched
pub fn plan_export(records: &[WineRecord], timestamp: i64) -> ExportPlan {
    let mut working = records.to_vec();
    let mut copies = Vec::new();

    for (index, record) in working.iter_mut().enumerate() {
        for kind in PhotoKind::ALL {
            let source = record.photo(kind);
            if source.is_empty() {
                continue;
            }

            let export_name = export_file_name(kind, index, timestamp, source);
            copies.push(PhotoCopy {
                kind,
                record_index: index,
                source: source.to_string(),
                export_name: export_name.clone(),
            });
            record.set_photo(kind, format!("{}{}", EXPORTED_PREFIX, export_name));
        }
    }

    ExportPlan {
        records: working,
        copies,
    }
}

/// Counts from materializing imported photos
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PhotoImportStats {
    pub restored: usize,
    pub cleared: usize,
}

/// Copy every photo referenced as `exported_images/<name>` from `images_dir` into the
/// album and point the field at the copy. Missing or uncopyable photos clear the field.
pub async fn materialize_imported_photos<B: StorageBackend>(
    storage: &B,
    album: &PhotoAlbum,
    records: &mut [WineRecord],
    images_dir: &str,
) -> PhotoImportStats {
    let mut stats = PhotoImportStats::default();

    for (index, record) in records.iter_mut().enumerate() {
        for kind in PhotoKind::ALL {
            let Some(name) = record.photo(kind).strip_prefix(EXPORTED_PREFIX) else {
                continue;
            };
            let source = format!("{}/{}", images_dir, name);
            let basename = file_basename(name).to_string();

            let exists = storage.file_exists(&source).await.unwrap_or_else(|e| {
                warn!("Cannot check photo {}: {}", source, e);
                false
            });
            if !exists {
                warn!(
                    "Record {}: {} not found at {}, clearing field",
                    index, kind, source
                );
                record.photo_mut(kind).clear();
                stats.cleared += 1;
                continue;
            }

            match album.import_photo(storage, &source, &basename).await {
                Ok(path) => {
                    debug!("Record {}: {} restored to {}", index, kind, path);
                    record.set_photo(kind, path);
                    stats.restored += 1;
                }
                Err(e) => {
                    warn!("Record {}: failed to copy {}: {}", index, kind, e);
                    record.photo_mut(kind).clear();
                    stats.cleared += 1;
                }
            }
        }
    }

    stats
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_extension() {
        assert_eq!(file_extension("/data/album/photo.png"), ".png");
        assert_eq!(file_extension("/data/album.d/photo"), ".jpg");
        assert_eq!(file_extension("shot.tar.gz"), ".gz");
        assert_eq!(file_extension(""), ".jpg");
    }

    #[test]
    fn test_export_file_name() {
        assert_eq!(
            export_file_name(PhotoKind::BackLabel, 3, 1700000000000, "/a/b.jpeg"),
            "backlabel_3_1700000000000.jpeg"
        );
    }

    #[test]
    fn test_plan_export_rewrites_working_copy_only() {
        let mut first = WineRecord::new("A", "One");
        first.bottle_photo = "/data/winetastenote/b.png".to_string();
        first.plaque_photo = "/data/winetastenote/p".to_string();
        let mut second = WineRecord::new("B", "Two");
        second.label_photo = "/data/winetastenote/l.jpg".to_string();
        let records = vec![first, second];

        let plan = plan_export(&records, 42);

        assert_eq!(records[0].bottle_photo, "/data/winetastenote/b.png");
        assert_eq!(plan.records[0].bottle_photo, "exported_images/bottle_0_42.png");
        assert_eq!(plan.records[0].plaque_photo, "exported_images/plaque_0_42.jpg");
        assert_eq!(plan.records[1].label_photo, "exported_images/label_1_42.jpg");
        assert!(plan.records[1].bottle_photo.is_empty());

        let names: Vec<_> = plan.copies.iter().map(|c| c.export_name.as_str()).collect();
        assert_eq!(
            names,
            vec!["bottle_0_42.png", "plaque_0_42.jpg", "label_1_42.jpg"]
        );
        assert_eq!(plan.copies[2].source, "/data/winetastenote/l.jpg");
        assert_eq!(plan.copies[2].record_index, 1);
    }
}
