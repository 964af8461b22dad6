//! `export` command

use std::path::PathBuf;

use async_trait::async_trait;
use clap::Args;
use tracing::info;
use winenote::{
    AlwaysGranted, AppConfig, NoShare, RecordStore, ShareError, ShareSink, StorageBackend,
    TransferService,
};

use crate::error::CliError;

/// Arguments for the `export` command
#[derive(Debug, Args)]
pub struct ExportArgs {
    /// Copy the finished archive to this file
    #[arg(long, short)]
    pub output: Option<PathBuf>,
    /// Keep the export directory instead of removing it after the cleanup delay
    #[arg(long)]
    pub keep: bool,
}

/// Shares an archive by copying it to a chosen destination
struct CopyToDestination {
    destination: PathBuf,
}

#[async_trait(?Send)]
impl ShareSink for CopyToDestination {
    async fn share(&self, path: &str, title: &str) -> Result<(), ShareError> {
        tokio::fs::copy(path, &self.destination)
            .await
            .map_err(|e| ShareError::Failed(e.to_string()))?;
        info!("{}: copied {} to {}", title, path, self.destination.display());
        Ok(())
    }
}

async fn export_with<B: StorageBackend, S: ShareSink>(
    store: &RecordStore<B>,
    service: TransferService<AlwaysGranted, S>,
) -> Result<(), CliError> {
    let summary = service.export_all(store).await?;

    println!("{}", summary.message());
    if let Some(readme) = &summary.result.readme_path {
        println!("Instructions: {}", readme);
    }

    if let Some(cleanup) = summary.cleanup {
        println!(
            "Waiting {}s before removing the export directory...",
            service.config().export_cleanup_delay_secs
        );
        if let Ok(outcome) = cleanup.await {
            info!("Cleanup finished: {:?}", outcome);
        }
    }
    Ok(())
}

/// Handle the `export` command
pub async fn handle_export<B: StorageBackend>(
    store: &RecordStore<B>,
    config: AppConfig,
    args: &ExportArgs,
) -> Result<(), CliError> {
    // Without a destination the archive would be removed together with its directory
    let keep = args.keep || args.output.is_none();

    match &args.output {
        Some(destination) => {
            let sink = CopyToDestination {
                destination: destination.clone(),
            };
            let mut service = TransferService::new(config, AlwaysGranted, sink);
            if keep {
                service = service.keep_exports();
            }
            export_with(store, service).await
        }
        None => {
            let service = TransferService::new(config, AlwaysGranted, NoShare).keep_exports();
            export_with(store, service).await
        }
    }
}
