//! Host platform collaborators: storage permission and share sheet

use async_trait::async_trait;

/// Grants or denies access to storage before any export or import I/O
#[async_trait(?Send)]
pub trait PermissionGate {
    async fn request_storage_permission(&self) -> bool;
}

/// Permission gate for hosts without a permission model
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysGranted;

#[async_trait(?Send)]
impl PermissionGate for AlwaysGranted {
    async fn request_storage_permission(&self) -> bool {
        true
    }
}

/// Error type for share operations
#[derive(Debug, thiserror::Error)]
pub enum ShareError {
    #[error("Sharing is not available on this device")]
    Unavailable,
    #[error("Share failed: {0}")]
    Failed(String),
}

/// Hands a finished archive to the platform's share mechanism
#[async_trait(?Send)]
pub trait ShareSink {
    async fn share(&self, path: &str, title: &str) -> Result<(), ShareError>;
}

/// Share sink for hosts that cannot share files
#[derive(Debug, Clone, Copy, Default)]
pub struct NoShare;

#[async_trait(?Send)]
impl ShareSink for NoShare {
    async fn share(&self, _path: &str, _title: &str) -> Result<(), ShareError> {
        Err(ShareError::Unavailable)
    }
}
