//! Deferred removal of temporary export and import directories
//!
//! A cleanup is a one-shot task: wait, remove the directory, and on failure wait once more
//! and retry exactly once. A failure after the retry is only logged.

use std::time::Duration;
#[cfg(feature = "native-fs")]
use std::{
    io,
    path::{Path, PathBuf},
};
#[cfg(feature = "native-fs")]
use tokio::task::JoinHandle;
#[cfg(feature = "native-fs")]
use tracing::{error, info, warn};

/// Delays used by a scheduled cleanup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CleanupPolicy {
    pub delay: Duration,
    pub retry_delay: Duration,
}

impl CleanupPolicy {
    pub fn new(delay: Duration, retry_delay: Duration) -> Self {
        Self { delay, retry_delay }
    }

    /// Remove right away, retry after `retry_delay`
    pub fn immediate(retry_delay: Duration) -> Self {
        Self::new(Duration::ZERO, retry_delay)
    }
}

impl Default for CleanupPolicy {
    fn default() -> Self {
        Self::new(Duration::from_secs(60), Duration::from_secs(60))
    }
}

/// How a scheduled cleanup ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CleanupOutcome {
    Removed,
    AlreadyGone,
    RemovedOnRetry,
    Failed,
}

/// Spawn the cleanup of `dir` on the current tokio runtime
#[cfg(feature = "native-fs")]
pub fn schedule(dir: impl Into<PathBuf>, policy: CleanupPolicy) -> JoinHandle<CleanupOutcome> {
    let dir = dir.into();
    tokio::spawn(async move { run(&dir, policy).await })
}

#[cfg(feature = "native-fs")]
async fn run(dir: &Path, policy: CleanupPolicy) -> CleanupOutcome {
    tokio::time::sleep(policy.delay).await;

    match remove_if_present(dir).await {
        Ok(true) => {
            info!("Removed temporary directory {}", dir.display());
            return CleanupOutcome::Removed;
        }
        Ok(false) => {
            info!("Temporary directory {} already gone", dir.display());
            return CleanupOutcome::AlreadyGone;
        }
        Err(e) => warn!(
            "Failed to remove {}: {}; retrying in {:?}",
            dir.display(),
            e,
            policy.retry_delay
        ),
    }

    tokio::time::sleep(policy.retry_delay).await;

    match remove_if_present(dir).await {
        Ok(true) => {
            info!("Removed temporary directory {} on retry", dir.display());
            CleanupOutcome::RemovedOnRetry
        }
        Ok(false) => CleanupOutcome::AlreadyGone,
        Err(e) => {
            error!("Giving up on removing {}: {}", dir.display(), e);
            CleanupOutcome::Failed
        }
    }
}

#[cfg(feature = "native-fs")]
async fn remove_if_present(dir: &Path) -> io::Result<bool> {
    if !tokio::fs::try_exists(dir).await? {
        return Ok(false);
    }
    tokio::fs::remove_dir_all(dir).await?;
    Ok(true)
}
