//! Application configuration
//!
//! Loaded from a TOML file; every key is optional and falls back to its default.
//!
//! ```toml
//! data_dir = "/home/me/.local/share/winenote"
//! export_cleanup_delay_secs = 120
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::cleanup::CleanupPolicy;
use crate::model::RECORDS_FILE_NAME;
use crate::photos::DEFAULT_ALBUM_NAME;

/// Error type for configuration loading
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Configuration for the record store and the export/import workflow
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Root of all application files
    pub data_dir: PathBuf,
    /// Persisted record file, relative to `data_dir`
    pub records_file: String,
    /// Photo album directory and file-name prefix
    pub album_name: String,
    /// Prefix of per-export directories
    pub export_prefix: String,
    /// Prefix of per-import extraction directories
    pub import_prefix: String,
    pub export_cleanup_delay_secs: u64,
    pub import_cleanup_delay_secs: u64,
    pub cleanup_retry_delay_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            records_file: RECORDS_FILE_NAME.to_string(),
            album_name: DEFAULT_ALBUM_NAME.to_string(),
            export_prefix: "WineTasting_Export".to_string(),
            import_prefix: "WineTasting_Import".to_string(),
            export_cleanup_delay_secs: 60,
            import_cleanup_delay_secs: 0,
            cleanup_retry_delay_secs: 60,
        }
    }
}

impl AppConfig {
    /// Create a new builder for AppConfig
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::default()
    }

    /// Parse a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Load a TOML config file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Cleanup delays after an export
    pub fn export_cleanup(&self) -> CleanupPolicy {
        CleanupPolicy::new(
            Duration::from_secs(self.export_cleanup_delay_secs),
            Duration::from_secs(self.cleanup_retry_delay_secs),
        )
    }

    /// Cleanup delays after an import
    pub fn import_cleanup(&self) -> CleanupPolicy {
        CleanupPolicy::new(
            Duration::from_secs(self.import_cleanup_delay_secs),
            Duration::from_secs(self.cleanup_retry_delay_secs),
        )
    }
}

/// Builder for AppConfig
#[derive(Debug, Default)]
pub struct AppConfigBuilder {
    config: AppConfig,
}

impl AppConfigBuilder {
    pub fn data_dir(mut self, data_dir: impl Into<PathBuf>) -> Self {
        self.config.data_dir = data_dir.into();
        self
    }

    pub fn records_file(mut self, records_file: &str) -> Self {
        self.config.records_file = records_file.to_string();
        self
    }

    pub fn album_name(mut self, album_name: &str) -> Self {
        self.config.album_name = album_name.to_string();
        self
    }

    /// Set both cleanup delays and the retry delay
    pub fn cleanup_delays(mut self, export: Duration, import: Duration, retry: Duration) -> Self {
        self.config.export_cleanup_delay_secs = export.as_secs();
        self.config.import_cleanup_delay_secs = import.as_secs();
        self.config.cleanup_retry_delay_secs = retry.as_secs();
        self
    }

    pub fn build(self) -> AppConfig {
        self.config
    }
}
