//! Export/import workflow tests

#[cfg(feature = "native-fs")]
mod transfer_tests {
    use std::path::Path;
    use std::time::Duration;

    use async_trait::async_trait;
    use tempfile::TempDir;
    use tokio::runtime::Runtime;
    use winenote::archive::{self, EntryData};
    use winenote::export::{ARCHIVE_FILE_NAME, DATA_FILE_NAME};
    use winenote::{
        AlwaysGranted, AppConfig, CleanupOutcome, ExportError, FileSystemStorageBackend,
        ImportError, MergePolicy, NoShare, PermissionGate, PhotoAlbum, PhotoKind, RecordStore,
        TransferService, WineRecord,
    };

    fn runtime() -> Runtime {
        tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap()
    }

    fn config(data_dir: &Path) -> AppConfig {
        AppConfig::builder()
            .data_dir(data_dir)
            .cleanup_delays(Duration::ZERO, Duration::ZERO, Duration::ZERO)
            .build()
    }

    fn service(data_dir: &Path) -> TransferService<AlwaysGranted, NoShare> {
        TransferService::new(config(data_dir), AlwaysGranted, NoShare).keep_exports()
    }

    async fn open_store(data_dir: &Path) -> RecordStore<FileSystemStorageBackend> {
        RecordStore::open(FileSystemStorageBackend::new(data_dir), "wine_records.json")
            .await
            .unwrap()
    }

    /// Store with three records: two photos, none, and one photo
    async fn seeded_store(data_dir: &Path) -> RecordStore<FileSystemStorageBackend> {
        let mut store = open_store(data_dir).await;
        let album = PhotoAlbum::default();

        let mut first = WineRecord::new("Chateau A", "Reserve");
        first.harvest_year = "2018".to_string();
        first.price = 1200.5;
        first.bottle_photo = album
            .save_photo(store.storage(), "bottle.png", b"bottle-bytes")
            .await
            .unwrap();
        first.label_photo = album
            .save_photo(store.storage(), "label.jpeg", b"label-bytes")
            .await
            .unwrap();
        store.add_record(first).await.unwrap();

        let mut second = WineRecord::new("Domaine B", "Blanc");
        second.taste = "Citrus, flint".to_string();
        store.add_record(second).await.unwrap();

        let mut third = WineRecord::new("Bodega C", "Tinto");
        third.plaque_photo = album
            .save_photo(store.storage(), "plaque", b"plaque-bytes")
            .await
            .unwrap();
        store.add_record(third).await.unwrap();

        store
    }

    fn archive_records(archive_path: &str) -> Vec<WineRecord> {
        let bytes = std::fs::read(archive_path).unwrap();
        let entries = archive::unpack(&bytes).unwrap();
        let data = entries.iter().find(|e| e.name == DATA_FILE_NAME).unwrap();
        serde_json::from_str(&data.text().unwrap()).unwrap()
    }

    fn image_entries(archive_path: &str) -> Vec<String> {
        let bytes = std::fs::read(archive_path).unwrap();
        archive::unpack(&bytes)
            .unwrap()
            .into_iter()
            .filter(|e| !e.is_dir && e.name.starts_with("exported_images/"))
            .map(|e| e.name)
            .collect()
    }

    /// Extraction directories left in the data directory
    fn import_dirs(data_dir: &Path) -> Vec<String> {
        std::fs::read_dir(data_dir)
            .unwrap()
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.file_name().to_string_lossy().into_owned())
            .filter(|name| name.starts_with("WineTasting_Import_"))
            .collect()
    }

    /// `exported_images/bottle_0_<ts>.png` -> `exported_images/bottle_0.png`
    fn strip_timestamp(photo: &str) -> String {
        match (photo.rfind('_'), photo.rfind('.')) {
            (Some(underscore), Some(dot)) if dot > underscore => {
                format!("{}{}", &photo[..underscore], &photo[dot..])
            }
            _ => photo.to_string(),
        }
    }

    struct Denied;

    #[async_trait(?Send)]
    impl PermissionGate for Denied {
        async fn request_storage_permission(&self) -> bool {
            false
        }
    }

    #[test]
    fn test_export_then_import_roundtrip() {
        let rt = runtime();
        rt.block_on(async {
            let temp = TempDir::new().unwrap();
            let mut store = seeded_store(temp.path()).await;
            let original = store.list_records().to_vec();
            let service = service(temp.path());

            let summary = service.export_all(&store).await.unwrap();
            assert_eq!(summary.result.total_images, 3);
            assert_eq!(summary.result.failed_images, 0);
            assert!(!summary.shared);
            assert!(summary.cleanup.is_none());
            assert!(summary.result.archive_path.ends_with(ARCHIVE_FILE_NAME));
            assert!(summary.message().contains(&summary.result.archive_path));

            let pending = service
                .prepare_import(&store, &summary.result.archive_path)
                .await
                .unwrap();
            assert_eq!(pending.len(), 3);
            assert_eq!(pending.result.photos.restored, 3);
            assert_eq!(pending.result.photos.cleared, 0);
            let extraction_dir = temp
                .path()
                .join(pending.result.extraction_dir.clone().unwrap());
            assert!(extraction_dir.exists());

            let summary = service
                .complete_import(&mut store, pending, MergePolicy::Replace)
                .await
                .unwrap();
            assert_eq!(summary.outcome.imported, 3);
            assert_eq!(summary.message(), "Data imported, 3 records loaded.");
            let outcome = summary.cleanup.unwrap().await.unwrap();
            assert_eq!(outcome, CleanupOutcome::Removed);
            assert!(!extraction_dir.exists());

            let imported = store.list_records();
            assert_eq!(imported.len(), original.len());
            for (before, after) in original.iter().zip(imported) {
                assert_eq!(before.without_photos(), after.without_photos());
                for kind in PhotoKind::ALL {
                    let old_path = before.photo(kind);
                    let new_path = after.photo(kind);
                    assert_eq!(old_path.is_empty(), new_path.is_empty(), "{kind}");
                    if !old_path.is_empty() {
                        assert_ne!(old_path, new_path);
                        assert_eq!(
                            std::fs::read(new_path).unwrap(),
                            std::fs::read(old_path).unwrap()
                        );
                    }
                }
            }

            let reopened = open_store(temp.path()).await;
            assert_eq!(reopened.list_records(), store.list_records());
        });
    }

    #[test]
    fn test_reexport_is_stable_modulo_timestamps() {
        let rt = runtime();
        rt.block_on(async {
            let temp = TempDir::new().unwrap();
            let store = seeded_store(temp.path()).await;
            let service = service(temp.path());

            let first = service.export_all(&store).await.unwrap();
            let second = service.export_all(&store).await.unwrap();
            assert_ne!(first.result.export_dir, second.result.export_dir);

            let first = archive_records(&first.result.archive_path);
            let second = archive_records(&second.result.archive_path);
            assert_eq!(first.len(), second.len());
            for (a, b) in first.iter().zip(&second) {
                assert_eq!(a.without_photos(), b.without_photos());
                for kind in PhotoKind::ALL {
                    assert_eq!(
                        strip_timestamp(a.photo(kind)),
                        strip_timestamp(b.photo(kind))
                    );
                }
            }
            assert_eq!(
                strip_timestamp(&first[0].bottle_photo),
                "exported_images/bottle_0.png"
            );
            assert_eq!(
                strip_timestamp(&first[2].plaque_photo),
                "exported_images/plaque_2.jpg"
            );
        });
    }

    #[test]
    fn test_export_with_missing_photo() {
        let rt = runtime();
        rt.block_on(async {
            let temp = TempDir::new().unwrap();
            let store = seeded_store(temp.path()).await;
            std::fs::remove_file(&store.list_records()[0].label_photo).unwrap();

            let summary = service(temp.path()).export_all(&store).await.unwrap();
            assert_eq!(summary.result.total_images, 3);
            assert_eq!(summary.result.failed_images, 1);
            assert!(summary.message().contains("(1 of 3)"));

            let images = image_entries(&summary.result.archive_path);
            assert_eq!(images.len(), 2);

            // The JSON still references the missing photo by its export name
            let records = archive_records(&summary.result.archive_path);
            assert!(records[0].label_photo.starts_with("exported_images/label_0_"));

            let readme = summary.result.readme_path.unwrap();
            let readme = std::fs::read_to_string(readme).unwrap();
            assert!(readme.contains("1 of 3 photos could not be copied"));
        });
    }

    #[test]
    fn test_export_empty_store() {
        let rt = runtime();
        rt.block_on(async {
            let temp = TempDir::new().unwrap();
            let store = open_store(temp.path()).await;

            let result = service(temp.path()).export_all(&store).await;
            assert!(matches!(result, Err(ExportError::EmptyInput)));
        });
    }

    #[test]
    fn test_permission_denied() {
        let rt = runtime();
        rt.block_on(async {
            let temp = TempDir::new().unwrap();
            let store = seeded_store(temp.path()).await;
            let service = TransferService::new(config(temp.path()), Denied, NoShare);

            let result = service.export_all(&store).await;
            assert!(matches!(result, Err(ExportError::PermissionDenied)));

            let result = service.prepare_import(&store, "anything.zip").await;
            assert!(matches!(result, Err(ImportError::PermissionDenied)));
        });
    }

    #[test]
    fn test_export_cleanup_removes_directory() {
        let rt = runtime();
        rt.block_on(async {
            let temp = TempDir::new().unwrap();
            let store = seeded_store(temp.path()).await;
            let service = TransferService::new(config(temp.path()), AlwaysGranted, NoShare);

            let summary = service.export_all(&store).await.unwrap();
            let export_dir = temp.path().join(&summary.result.export_dir);
            assert!(export_dir.exists());

            let outcome = summary.cleanup.unwrap().await.unwrap();
            assert_eq!(outcome, CleanupOutcome::Removed);
            assert!(!export_dir.exists());
        });
    }

    #[test]
    fn test_import_rejects_non_array() {
        let rt = runtime();
        rt.block_on(async {
            let temp = TempDir::new().unwrap();
            let store = seeded_store(temp.path()).await;
            let before = std::fs::read(temp.path().join("wine_records.json")).unwrap();
            std::fs::write(temp.path().join("bad.json"), "\"not an array\"").unwrap();

            let result = service(temp.path()).prepare_import(&store, "bad.json").await;
            assert!(matches!(result, Err(ImportError::MalformedData(_))));

            let after = std::fs::read(temp.path().join("wine_records.json")).unwrap();
            assert_eq!(before, after);
            assert_eq!(store.len(), 3);
        });
    }

    #[test]
    fn test_import_archive_without_data_file() {
        let rt = runtime();
        rt.block_on(async {
            let temp = TempDir::new().unwrap();
            let store = open_store(temp.path()).await;
            let bytes = archive::pack(&[(
                "notes.txt".to_string(),
                EntryData::Text("hello".to_string()),
            )])
            .unwrap();
            std::fs::write(temp.path().join("broken.zip"), bytes).unwrap();

            let result = service(temp.path()).prepare_import(&store, "broken.zip").await;
            assert!(matches!(result, Err(ImportError::ArchiveCorrupt(_))));
            assert!(store.is_empty());
            assert!(import_dirs(temp.path()).is_empty());
        });
    }

    #[test]
    fn test_import_data_file_not_utf8() {
        let rt = runtime();
        rt.block_on(async {
            let temp = TempDir::new().unwrap();
            let store = open_store(temp.path()).await;
            let bytes = archive::pack(&[(
                DATA_FILE_NAME.to_string(),
                archive::encode_binary(&[0xff, 0xfe, 0x00, 0x5b]),
            )])
            .unwrap();
            std::fs::write(temp.path().join("latin1.zip"), bytes).unwrap();

            let result = service(temp.path()).prepare_import(&store, "latin1.zip").await;
            assert!(matches!(result, Err(ImportError::MalformedData(_))));
            assert!(import_dirs(temp.path()).is_empty());
        });
    }

    #[test]
    fn test_import_corrupt_zip() {
        let rt = runtime();
        rt.block_on(async {
            let temp = TempDir::new().unwrap();
            let store = open_store(temp.path()).await;
            std::fs::write(temp.path().join("garbage.zip"), b"definitely not a zip").unwrap();

            let result = service(temp.path())
                .prepare_import(&store, "garbage.zip")
                .await;
            assert!(matches!(result, Err(ImportError::ArchiveCorrupt(_))));

            // The extraction directory is gone as soon as the error is returned
            assert!(import_dirs(temp.path()).is_empty());
            assert!(temp.path().join("garbage.zip").exists());
        });
    }

    #[test]
    fn test_import_bare_json_with_sibling_images() {
        let rt = runtime();
        rt.block_on(async {
            let temp = TempDir::new().unwrap();
            let mut store = open_store(temp.path()).await;
            store
                .add_record(WineRecord::new("Existing", "Wine"))
                .await
                .unwrap();

            let incoming = temp.path().join("incoming");
            std::fs::create_dir_all(incoming.join("exported_images")).unwrap();
            std::fs::write(
                incoming.join("exported_images/bottle_0_42.jpg"),
                b"bottle",
            )
            .unwrap();
            std::fs::write(
                incoming.join(DATA_FILE_NAME),
                r#"[{
                    "wineryName": "Imported",
                    "wineName": "Red",
                    "price": "abc",
                    "bottlePhoto": "exported_images/bottle_0_42.jpg",
                    "labelPhoto": "exported_images/label_0_42.jpg"
                }]"#,
            )
            .unwrap();

            let service = service(temp.path());
            let pending = service
                .prepare_import(&store, &format!("incoming/{}", DATA_FILE_NAME))
                .await
                .unwrap();
            assert!(pending.result.extraction_dir.is_none());
            assert_eq!(pending.result.photos.restored, 1);
            assert_eq!(pending.result.photos.cleared, 1);
            assert_eq!(
                pending.prompt(),
                "Found 1 records. How should they be imported?"
            );

            let summary = service
                .complete_import(&mut store, pending, MergePolicy::Append)
                .await
                .unwrap();
            assert!(summary.cleanup.is_none());
            assert_eq!(summary.message(), "Data added, 2 records in total.");

            let imported = &store.list_records()[1];
            assert_eq!(imported.wine_name, "Red");
            assert_eq!(imported.price, 0.0);
            assert!(imported.label_photo.is_empty());
            let album_dir = temp.path().join("winetastenote");
            assert!(Path::new(&imported.bottle_photo).starts_with(&album_dir));
            assert_eq!(std::fs::read(&imported.bottle_photo).unwrap(), b"bottle");

            // The source folder is left alone for bare JSON imports
            assert!(incoming.join("exported_images/bottle_0_42.jpg").exists());
        });
    }

    #[test]
    fn test_cancel_keeps_store_and_removes_extraction() {
        let rt = runtime();
        rt.block_on(async {
            let temp = TempDir::new().unwrap();
            let mut store = seeded_store(temp.path()).await;
            let original = store.list_records().to_vec();
            let service = service(temp.path());

            let exported = service.export_all(&store).await.unwrap();
            let pending = service
                .prepare_import(&store, &exported.result.archive_path)
                .await
                .unwrap();
            let extraction_dir = temp
                .path()
                .join(pending.result.extraction_dir.clone().unwrap());

            let summary = service
                .complete_import(&mut store, pending, MergePolicy::Cancel)
                .await
                .unwrap();
            assert_eq!(summary.outcome.imported, 0);
            assert_eq!(summary.message(), "Import cancelled.");
            summary.cleanup.unwrap().await.unwrap();

            assert!(!extraction_dir.exists());
            assert_eq!(store.list_records(), original.as_slice());
        });
    }
}
