//! CLI error type

use std::path::PathBuf;

use winenote::{ConfigError, ExportError, ImportError, StorageError, StoreError};

/// Errors surfaced by CLI commands
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("Failed to read {0}: {1}")]
    FileReadError(PathBuf, String),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Export(#[from] ExportError),
    #[error(transparent)]
    Import(#[from] ImportError),
}

impl CliError {
    /// Message printed to the user; the detail goes to the log
    pub fn user_message(&self) -> String {
        match self {
            CliError::Store(e) => e.user_message(),
            CliError::Export(e) => e.user_message(),
            CliError::Import(e) => e.user_message(),
            _ => self.to_string(),
        }
    }
}
