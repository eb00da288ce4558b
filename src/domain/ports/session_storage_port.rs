//! Session persistence port definition.

use async_trait::async_trait;

use crate::domain::entities::{AuthToken, User};
use crate::domain::errors::StorageError;

/// Session values found in device storage.
#[derive(Debug, Clone, Default)]
pub struct PersistedSession {
    pub token: Option<AuthToken>,
    pub user: Option<User>,
}

/// Port for persisting the `token` and `user` keys across launches.
#[async_trait]
pub trait SessionStoragePort: Send + Sync {
    /// Reads the persisted token and user.
    async fn load(&self) -> Result<PersistedSession, StorageError>;

    /// Persists token and user together.
    async fn store(&self, token: &AuthToken, user: &User) -> Result<(), StorageError>;

    /// Removes both keys. Missing keys are not an error.
    async fn clear(&self) -> Result<(), StorageError>;

    /// Checks if a token is persisted.
    async fn has_token(&self) -> Result<bool, StorageError> {
        Ok(self.load().await?.token.is_some())
    }
}
