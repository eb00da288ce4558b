//! Keyring-based session storage.

use async_trait::async_trait;
use keyring::Entry;
use tracing::{debug, warn};

use crate::domain::entities::{AuthToken, User};
use crate::domain::errors::StorageError;
use crate::domain::ports::{PersistedSession, SessionStoragePort};

const KEYRING_SERVICE: &str = "curametric";
const TOKEN_KEY: &str = "token";
const USER_KEY: &str = "user";

/// System keyring session storage adapter.
///
/// The token and the serialized user live in two entries of the same service.
pub struct KeyringSessionStorage {
    service: String,
}

impl KeyringSessionStorage {
    /// Creates new storage with the default service name.
    #[must_use]
    pub fn new() -> Self {
        Self::with_service(KEYRING_SERVICE)
    }

    /// Creates storage under a custom service name.
    #[must_use]
    pub fn with_service(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
        }
    }

    fn entry(&self, key: &str) -> Result<Entry, StorageError> {
        Entry::new(&self.service, key)
            .map_err(|e| StorageError::AccessFailed(format!("failed to access keyring: {e}")))
    }

    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        match self.entry(key)?.get_password() {
            Ok(value) => Ok(Some(value)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => {
                warn!(error = %e, key, "Failed to read keyring entry");
                Err(StorageError::RetrievalFailed(e.to_string()))
            }
        }
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entry(key)?
            .set_password(value)
            .map_err(|e| StorageError::StorageFailed(e.to_string()))
    }

    fn delete(&self, key: &str) -> Result<(), StorageError> {
        match self.entry(key)?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => {
                warn!(error = %e, key, "Failed to delete keyring entry");
                Err(StorageError::DeletionFailed(e.to_string()))
            }
        }
    }
}

/// Writes the user entry before the token, so a token never outlives a failed write.
/// On failure the entries touched so far are removed again.
fn write_session(
    user_json: &str,
    token: &str,
    mut write: impl FnMut(&str, &str) -> Result<(), StorageError>,
    mut delete: impl FnMut(&str) -> Result<(), StorageError>,
) -> Result<(), StorageError> {
    if let Err(e) = write(USER_KEY, user_json) {
        remove_entries(&[TOKEN_KEY], &mut delete);
        return Err(e);
    }
    if let Err(e) = write(TOKEN_KEY, token) {
        remove_entries(&[TOKEN_KEY, USER_KEY], &mut delete);
        return Err(e);
    }
    Ok(())
}

fn remove_entries(
    keys: &[&str],
    delete: &mut impl FnMut(&str) -> Result<(), StorageError>,
) {
    for &key in keys {
        if let Err(e) = delete(key) {
            warn!(error = %e, key, "Failed to roll back keyring entry");
        }
    }
}

impl Default for KeyringSessionStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionStoragePort for KeyringSessionStorage {
    async fn load(&self) -> Result<PersistedSession, StorageError> {
        debug!(service = %self.service, "Loading session from keyring");

        let token = self.read(TOKEN_KEY)?.and_then(AuthToken::new);
        let user = self
            .read(USER_KEY)?
            .and_then(|json| match serde_json::from_str::<User>(&json) {
                Ok(user) => Some(user),
                Err(e) => {
                    warn!(error = %e, "Stored user is unreadable");
                    None
                }
            });

        Ok(PersistedSession { token, user })
    }

    async fn store(&self, token: &AuthToken, user: &User) -> Result<(), StorageError> {
        debug!(service = %self.service, "Storing session in keyring");

        let user_json =
            serde_json::to_string(user).map_err(|e| StorageError::StorageFailed(e.to_string()))?;

        write_session(
            &user_json,
            token.as_str(),
            |key, value| self.write(key, value),
            |key| self.delete(key),
        )?;

        debug!("Session stored successfully");
        Ok(())
    }

    async fn clear(&self) -> Result<(), StorageError> {
        debug!(service = %self.service, "Deleting session from keyring");
        let token = self.delete(TOKEN_KEY);
        let user = self.delete(USER_KEY);
        token.and(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashMap;

    /// In-memory entries; writes to `failing` return an error.
    fn run_write(
        entries: &RefCell<HashMap<String, String>>,
        failing: &str,
    ) -> Result<(), StorageError> {
        write_session(
            r#"{"id": 7}"#,
            "header.payload.signature",
            |key, value| {
                if key == failing {
                    return Err(StorageError::StorageFailed("keyring locked".to_string()));
                }
                entries.borrow_mut().insert(key.to_string(), value.to_string());
                Ok(())
            },
            |key| {
                entries.borrow_mut().remove(key);
                Ok(())
            },
        )
    }

    #[test]
    fn test_write_session_stores_both_entries() {
        let entries = RefCell::new(HashMap::new());
        run_write(&entries, "none").unwrap();
        assert_eq!(entries.borrow().len(), 2);
        assert!(entries.borrow().contains_key(TOKEN_KEY));
    }

    #[test]
    fn test_failed_user_write_removes_stale_token() {
        let entries = RefCell::new(HashMap::from([(
            TOKEN_KEY.to_string(),
            "old.token.value".to_string(),
        )]));

        let result = run_write(&entries, USER_KEY);

        assert!(matches!(result, Err(StorageError::StorageFailed(_))));
        assert!(entries.borrow().is_empty());
    }

    #[test]
    fn test_failed_token_write_removes_user() {
        let entries = RefCell::new(HashMap::new());

        let result = run_write(&entries, TOKEN_KEY);

        assert!(result.is_err());
        assert!(!entries.borrow().contains_key(TOKEN_KEY));
        assert!(!entries.borrow().contains_key(USER_KEY));
    }

    #[tokio::test]
    #[ignore = "requires system keyring"]
    async fn test_store_load_and_clear() {
        let storage = KeyringSessionStorage::with_service("curametric-test");
        let token = AuthToken::new_unchecked("header.payload.signature");
        let user = User::new(7_u64, "Ana", "Rojas", "ana@clinic.cl");

        storage.store(&token, &user).await.unwrap();

        let loaded = storage.load().await.unwrap();
        assert_eq!(loaded.token, Some(token));
        assert_eq!(loaded.user, Some(user));

        storage.clear().await.unwrap();
        assert!(!storage.has_token().await.unwrap());
    }
}
