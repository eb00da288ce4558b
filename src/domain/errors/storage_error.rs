//! Session storage error types.

use thiserror::Error;

/// Session storage error variants.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to access session storage: {0}")]
    AccessFailed(String),

    #[error("failed to read stored session: {0}")]
    RetrievalFailed(String),

    #[error("failed to store session: {0}")]
    StorageFailed(String),

    #[error("failed to delete stored session: {0}")]
    DeletionFailed(String),

    #[error("stored session is corrupt: {0}")]
    Corrupt(String),
}
