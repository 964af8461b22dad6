//! `import` command

use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Args;
use tracing::{info, warn};
use winenote::cleanup::{self, CleanupPolicy};
use winenote::import::is_archive_path;
use winenote::photos::EXPORTED_IMAGES_DIR;
use winenote::{
    AlwaysGranted, AppConfig, MergePolicy, NoShare, RecordStore, StorageBackend, TransferService,
};

use crate::error::CliError;

const CACHE_DIR: &str = "cache";

/// Arguments for the `import` command
#[derive(Debug, Args)]
pub struct ImportArgs {
    /// ZIP bundle or WineTastingData.json to import
    pub file: PathBuf,
    /// Replace all existing records
    #[arg(long, conflicts_with = "append")]
    pub replace: bool,
    /// Add the imported records after the existing ones
    #[arg(long)]
    pub append: bool,
}

impl ImportArgs {
    fn policy(&self) -> MergePolicy {
        if self.replace {
            MergePolicy::Replace
        } else if self.append {
            MergePolicy::Append
        } else {
            MergePolicy::Cancel
        }
    }
}

async fn copy_into(source: &Path, target_dir: &Path) -> Result<PathBuf, CliError> {
    tokio::fs::create_dir_all(target_dir)
        .await
        .map_err(|e| CliError::FileReadError(target_dir.to_path_buf(), e.to_string()))?;
    let name = source
        .file_name()
        .ok_or_else(|| CliError::InvalidArgument(format!("Not a file: {}", source.display())))?;
    let target = target_dir.join(name);
    tokio::fs::copy(source, &target)
        .await
        .map_err(|e| CliError::FileReadError(source.to_path_buf(), e.to_string()))?;
    Ok(target)
}

/// Make `file` reachable through the storage backend.
///
/// Files outside the data directory are copied into `<data>/cache`, together with the
/// sibling photo folder of a bare JSON file.
async fn stage_source(data_dir: &Path, file: &Path) -> Result<(PathBuf, bool), CliError> {
    let canonical = tokio::fs::canonicalize(file)
        .await
        .map_err(|e| CliError::FileReadError(file.to_path_buf(), e.to_string()))?;
    if canonical.starts_with(data_dir) {
        return Ok((canonical, false));
    }

    let cache = data_dir.join(CACHE_DIR);
    let staged = copy_into(&canonical, &cache).await?;

    let is_archive = staged.to_str().is_some_and(is_archive_path);
    if !is_archive
        && let Some(parent) = canonical.parent()
    {
        let images = parent.join(EXPORTED_IMAGES_DIR);
        if let Ok(mut entries) = tokio::fs::read_dir(&images).await {
            let target_dir = cache.join(EXPORTED_IMAGES_DIR);
            while let Ok(Some(entry)) = entries.next_entry().await {
                let path = entry.path();
                if path.is_file()
                    && let Err(e) = copy_into(&path, &target_dir).await
                {
                    warn!("Failed to stage {}: {}", path.display(), e);
                }
            }
        }
    }

    info!("Staged {} as {}", file.display(), staged.display());
    Ok((staged, true))
}

/// Handle the `import` command
pub async fn handle_import<B: StorageBackend>(
    store: &mut RecordStore<B>,
    config: AppConfig,
    args: &ImportArgs,
) -> Result<(), CliError> {
    let (source, staged) = stage_source(&config.data_dir, &args.file).await?;
    let cache = config.data_dir.join(CACHE_DIR);
    let service = TransferService::new(config, AlwaysGranted, NoShare);

    let result = async {
        let pending = service
            .prepare_import(store, &source.display().to_string())
            .await?;
        println!("{}", pending.prompt());
        if pending.result.photos.cleared > 0 {
            println!(
                "{} photos referenced by the file were not found and have been dropped.",
                pending.result.photos.cleared
            );
        }

        let policy = args.policy();
        let summary = service.complete_import(store, pending, policy).await?;
        println!("{}", summary.message());
        if policy == MergePolicy::Cancel {
            println!("Run again with --replace or --append to import the records.");
        }

        if let Some(cleanup) = summary.cleanup {
            let _ = cleanup.await;
        }
        Ok::<(), CliError>(())
    }
    .await;

    if staged {
        let _ = cleanup::schedule(cache, CleanupPolicy::immediate(Duration::ZERO)).await;
    }
    result
}
