//! Archive reader

use super::{ImportError, ImportResult};
use crate::archive;
use crate::export::DATA_FILE_NAME;
use crate::models::WineRecord;
use crate::photos::{self, EXPORTED_IMAGES_DIR, PhotoAlbum};
use crate::storage::StorageBackend;
use serde_json::Value;
use tracing::{debug, info, warn};

/// Whether `path` names a ZIP archive rather than a bare JSON file
pub fn is_archive_path(path: &str) -> bool {
    path.to_lowercase().ends_with(".zip")
}

/// Parse the JSON payload of a bundle.
///
/// The payload must be a non-empty array whose first element is an object carrying both
/// `wineName` and `wineryName`. This is a structural sniff test, not full validation.
pub fn parse_records(json: &str) -> Result<Vec<WineRecord>, ImportError> {
    let value: Value = serde_json::from_str(json)
        .map_err(|e| ImportError::MalformedData(format!("invalid JSON: {}", e)))?;

    let Value::Array(items) = &value else {
        return Err(ImportError::MalformedData(
            "expected an array of records".to_string(),
        ));
    };

    let looks_like_record = items.first().is_some_and(|first| {
        first
            .as_object()
            .is_some_and(|obj| obj.contains_key("wineName") && obj.contains_key("wineryName"))
    });
    if !looks_like_record {
        return Err(ImportError::MalformedData(
            "first element is not a wine record".to_string(),
        ));
    }

    serde_json::from_value(value)
        .map_err(|e| ImportError::MalformedData(format!("invalid record: {}", e)))
}

/// Raw payload and photo folder of an import source
#[derive(Debug, Clone, PartialEq, Eq)]
struct Extracted {
    json: String,
    images_dir: String,
}

/// Reads ZIP bundles or bare JSON files
#[derive(Debug, Clone, Default)]
pub struct ArchiveReader {
    album: PhotoAlbum,
}

impl ArchiveReader {
    pub fn new(album: PhotoAlbum) -> Self {
        Self { album }
    }

    /// Read `source` and materialize its photos into the album.
    ///
    /// Archives are unpacked into `extraction_dir`; for a bare JSON file no extraction
    /// happens and the photos are read from the sibling `exported_images/` folder.
    pub async fn read<B: StorageBackend>(
        &self,
        storage: &B,
        source: &str,
        extraction_dir: &str,
    ) -> Result<ImportResult, ImportError> {
        let (extracted, extraction_dir) = if is_archive_path(source) {
            let extracted = self.extract_archive(storage, source, extraction_dir).await?;
            (extracted, Some(extraction_dir.to_string()))
        } else {
            (self.read_json_file(storage, source).await?, None)
        };

        let mut records = parse_records(&extracted.json)?;
        let photos = photos::materialize_imported_photos(
            storage,
            &self.album,
            &mut records,
            &extracted.images_dir,
        )
        .await;

        info!(
            "Read {} records from {} ({} photos restored, {} cleared)",
            records.len(),
            source,
            photos.restored,
            photos.cleared
        );

        Ok(ImportResult {
            records,
            images_dir: extracted.images_dir,
            extraction_dir,
            photos,
        })
    }

    async fn read_json_file<B: StorageBackend>(
        &self,
        storage: &B,
        source: &str,
    ) -> Result<Extracted, ImportError> {
        let json = storage.read_text(source).await?;
        let images_dir = match source.rfind('/') {
            Some(pos) => format!("{}/{}", &source[..pos], EXPORTED_IMAGES_DIR),
            None => EXPORTED_IMAGES_DIR.to_string(),
        };
        Ok(Extracted { json, images_dir })
    }

    async fn extract_archive<B: StorageBackend>(
        &self,
        storage: &B,
        source: &str,
        extraction_dir: &str,
    ) -> Result<Extracted, ImportError> {
        let images_dir = format!("{}/{}", extraction_dir, EXPORTED_IMAGES_DIR);
        storage.create_dir(&images_dir).await?;

        let bytes = storage.read_file(source).await?;
        let entries =
            archive::unpack(&bytes).map_err(|e| ImportError::ArchiveCorrupt(e.to_string()))?;

        let json = entries
            .iter()
            .find(|entry| entry.name == DATA_FILE_NAME)
            .ok_or_else(|| {
                ImportError::ArchiveCorrupt(format!("{} is missing from {}", DATA_FILE_NAME, source))
            })?
            .text()
            .map_err(|e| ImportError::MalformedData(e.to_string()))?;

        storage
            .write_file(
                &format!("{}/{}", extraction_dir, DATA_FILE_NAME),
                json.as_bytes(),
            )
            .await?;

        let prefix = format!("{}/", EXPORTED_IMAGES_DIR);
        for entry in &entries {
            let Some(name) = entry.name.strip_prefix(&prefix) else {
                continue;
            };
            if entry.is_dir || name.is_empty() {
                continue;
            }

            let target = format!("{}/{}", images_dir, name);
            let written = match entry.bytes() {
                Ok(content) => storage.write_file(&target, &content).await.map_err(|e| e.to_string()),
                Err(e) => Err(e.to_string()),
            };
            match written {
                Ok(()) => debug!("Extracted {}", name),
                Err(e) => warn!("Failed to extract {}: {}", entry.name, e),
            }
        }

        Ok(Extracted { json, images_dir })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_archive_path() {
        assert!(is_archive_path("/data/cache/WineTastingExport.zip"));
        assert!(is_archive_path("EXPORT.ZIP"));
        assert!(!is_archive_path("WineTastingData.json"));
    }

    #[test]
    fn test_parse_records_accepts_export_payload() {
        let json = r#"[{"wineryName": "A", "wineName": "B", "price": 10},
                       {"wineryName": "C", "wineName": "D"}]"#;
        let records = parse_records(json).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].price, 10.0);
    }

    #[test]
    fn test_parse_records_rejects_wrong_shapes() {
        for json in [
            r#""not an array""#,
            "{not json",
            "[]",
            r#"[{"wineName": "only one key"}]"#,
            "[1, 2, 3]",
            r#"{"wineryName": "A", "wineName": "B"}"#,
        ] {
            assert!(
                matches!(parse_records(json), Err(ImportError::MalformedData(_))),
                "accepted {json}"
            );
        }
    }
}
