//! JSON file session storage for systems without a keyring.

use std::io::Write;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tracing::{debug, warn};

use crate::domain::entities::{AuthToken, User};
use crate::domain::errors::StorageError;
use crate::domain::ports::{PersistedSession, SessionStoragePort};

/// File name used inside the data directory.
pub const SESSION_FILE: &str = "session.json";

#[derive(Default, Serialize, Deserialize)]
struct StoredSession {
    #[serde(default)]
    token: Option<String>,
    #[serde(default)]
    user: Option<serde_json::Value>,
}

/// Session storage in a JSON file, written atomically.
pub struct FileSessionStorage {
    path: PathBuf,
}

impl FileSessionStorage {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Storage at `<dir>/session.json`.
    #[must_use]
    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join(SESSION_FILE))
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_atomic(&self, content: &str) -> Result<(), StorageError> {
        let dir = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        std::fs::create_dir_all(dir).map_err(|e| StorageError::AccessFailed(e.to_string()))?;

        let mut temp =
            NamedTempFile::new_in(dir).map_err(|e| StorageError::StorageFailed(e.to_string()))?;
        temp.write_all(content.as_bytes())
            .map_err(|e| StorageError::StorageFailed(e.to_string()))?;
        temp.persist(&self.path)
            .map_err(|e| StorageError::StorageFailed(e.to_string()))?;
        Ok(())
    }
}

#[async_trait]
impl SessionStoragePort for FileSessionStorage {
    async fn load(&self) -> Result<PersistedSession, StorageError> {
        debug!(path = %self.path.display(), "Loading session file");

        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(PersistedSession::default());
            }
            Err(e) => return Err(StorageError::RetrievalFailed(e.to_string())),
        };

        let stored: StoredSession = serde_json::from_str(&content).unwrap_or_else(|e| {
            warn!(error = %e, "Session file is corrupt, ignoring it");
            StoredSession::default()
        });

        let user = stored
            .user
            .and_then(|value| serde_json::from_value::<User>(value).ok());
        Ok(PersistedSession {
            token: stored.token.and_then(AuthToken::new),
            user,
        })
    }

    async fn store(&self, token: &AuthToken, user: &User) -> Result<(), StorageError> {
        let user =
            serde_json::to_value(user).map_err(|e| StorageError::StorageFailed(e.to_string()))?;
        let stored = StoredSession {
            token: Some(token.as_str().to_string()),
            user: Some(user),
        };
        let content = serde_json::to_string_pretty(&stored)
            .map_err(|e| StorageError::StorageFailed(e.to_string()))?;
        self.write_atomic(&content)?;
        debug!(path = %self.path.display(), "Session file written");
        Ok(())
    }

    async fn clear(&self) -> Result<(), StorageError> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::DeletionFailed(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use tokio_test::assert_ok;

    fn user() -> User {
        User::new(7_u64, "Ana", "Rojas", "ana@clinic.cl")
    }

    #[tokio::test]
    async fn test_missing_file_is_empty_session() {
        let dir = TempDir::new().unwrap();
        let storage = FileSessionStorage::in_dir(dir.path());

        let session = assert_ok!(storage.load().await);

        assert!(session.token.is_none());
        assert!(session.user.is_none());
        assert_ok!(storage.clear().await);
    }

    #[tokio::test]
    async fn test_store_load_clear() {
        let dir = TempDir::new().unwrap();
        let storage = FileSessionStorage::in_dir(&dir.path().join("nested"));
        let token = AuthToken::new_unchecked("header.payload.signature");

        storage.store(&token, &user()).await.unwrap();
        let session = storage.load().await.unwrap();
        assert_eq!(session.token, Some(token));
        assert_eq!(session.user, Some(user()));

        assert_ok!(storage.clear().await);
        assert!(!storage.path().exists());
        assert!(!storage.has_token().await.unwrap());
    }

    #[tokio::test]
    async fn test_unreadable_user_keeps_token() {
        let dir = TempDir::new().unwrap();
        let storage = FileSessionStorage::in_dir(dir.path());
        std::fs::write(
            storage.path(),
            r#"{"token": "header.payload.signature", "user": {"id": "not a number"}}"#,
        )
        .unwrap();

        let session = storage.load().await.unwrap();

        assert!(session.token.is_some());
        assert!(session.user.is_none());
    }

    #[tokio::test]
    async fn test_corrupt_file_is_empty_session() {
        let dir = TempDir::new().unwrap();
        let storage = FileSessionStorage::in_dir(dir.path());
        std::fs::write(storage.path(), "{not json").unwrap();

        let session = storage.load().await.unwrap();

        assert!(session.token.is_none());
    }
}
