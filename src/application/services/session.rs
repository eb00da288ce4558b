//! In-memory session context backed by persisted storage.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::domain::entities::{AuthToken, User};
use crate::domain::errors::StorageError;
use crate::domain::ports::SessionStoragePort;

/// Authentication state of the running client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    /// Not yet reconciled with the backend.
    #[default]
    Unknown,
    Authenticated,
    Unauthenticated,
}

/// Holds `{token, is_authenticated, user}` and mirrors it to storage.
///
/// All mutation goes through [`login`](Self::login),
/// [`restore`](Self::restore), [`mark_unauthenticated`](Self::mark_unauthenticated)
/// and [`logout`](Self::logout). Once the state leaves `Unknown` it never
/// returns to it.
pub struct SessionContext {
    state: SessionState,
    token: Option<AuthToken>,
    user: Option<User>,
    storage: Arc<dyn SessionStoragePort>,
}

impl SessionContext {
    #[must_use]
    pub fn new(storage: Arc<dyn SessionStoragePort>) -> Self {
        Self {
            state: SessionState::Unknown,
            token: None,
            user: None,
            storage,
        }
    }

    #[must_use]
    pub const fn state(&self) -> SessionState {
        self.state
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.state == SessionState::Authenticated
    }

    #[must_use]
    pub const fn token(&self) -> Option<&AuthToken> {
        self.token.as_ref()
    }

    #[must_use]
    pub const fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    /// Shared handle to the persisted store.
    #[must_use]
    pub fn storage(&self) -> Arc<dyn SessionStoragePort> {
        Arc::clone(&self.storage)
    }

    /// Persists the session, then marks it authenticated in memory.
    ///
    /// # Errors
    /// Returns error if storage fails. Whatever was partially stored is cleared
    /// and memory is left untouched.
    pub async fn login(&mut self, token: AuthToken, user: User) -> Result<(), StorageError> {
        if let Err(e) = self.storage.store(&token, &user).await {
            warn!(error = %e, "Failed to persist session, discarding partial write");
            if let Err(cleanup) = self.storage.clear().await {
                warn!(error = %cleanup, "Failed to discard partially stored session");
            }
            return Err(e);
        }
        info!(user_id = %user.id(), token = %token, "Session started");
        self.set_authenticated(token, user);
        Ok(())
    }

    /// Re-populates memory from already persisted values.
    pub fn restore(&mut self, token: AuthToken, user: User) {
        debug!(user_id = %user.id(), "Session restored from storage");
        self.set_authenticated(token, user);
    }

    /// Drops the in-memory session without touching storage.
    pub fn mark_unauthenticated(&mut self) {
        self.token = None;
        self.user = None;
        self.state = SessionState::Unauthenticated;
    }

    /// Clears memory and persisted storage. Storage failures are logged only.
    pub async fn logout(&mut self) {
        self.mark_unauthenticated();
        match self.storage.clear().await {
            Ok(()) => info!("Session cleared"),
            Err(e) => warn!(error = %e, "Failed to clear persisted session"),
        }
    }

    fn set_authenticated(&mut self, token: AuthToken, user: User) {
        self.token = Some(token);
        self.user = Some(user);
        self.state = SessionState::Authenticated;
    }
}

impl std::fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionContext")
            .field("state", &self.state)
            .field("token", &self.token)
            .field("user", &self.user)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::mocks::{MockAuthPort, MockSessionStorage};

    fn user() -> User {
        User::new(7_u64, "Ana", "Rojas", "ana@clinic.cl")
    }

    #[tokio::test]
    async fn test_new_context_is_unknown() {
        let context = SessionContext::new(Arc::new(MockSessionStorage::new()));
        assert_eq!(context.state(), SessionState::Unknown);
        assert!(!context.is_authenticated());
        assert!(context.token().is_none());
    }

    #[tokio::test]
    async fn test_login_persists_then_authenticates() {
        let storage = Arc::new(MockSessionStorage::new());
        let mut context = SessionContext::new(storage.clone());

        context.login(MockAuthPort::token(), user()).await.unwrap();

        assert!(context.is_authenticated());
        assert_eq!(context.user().unwrap().first_name(), "Ana");
        let persisted = storage.snapshot().await;
        assert_eq!(persisted.token, Some(MockAuthPort::token()));
        assert_eq!(persisted.user, Some(user()));
    }

    #[tokio::test]
    async fn test_failed_store_leaves_no_token_behind() {
        let storage = Arc::new(MockSessionStorage::new().fail_on_store());
        let mut context = SessionContext::new(storage.clone());

        let result = context.login(MockAuthPort::token(), user()).await;

        assert!(matches!(result, Err(StorageError::StorageFailed(_))));
        assert!(!context.is_authenticated());
        assert!(context.token().is_none());
        let persisted = storage.snapshot().await;
        assert!(persisted.token.is_none());
        assert!(persisted.user.is_none());
    }

    #[tokio::test]
    async fn test_logout_clears_memory_and_storage() {
        let storage = Arc::new(MockSessionStorage::new());
        let mut context = SessionContext::new(storage.clone());
        context.login(MockAuthPort::token(), user()).await.unwrap();

        context.logout().await;

        assert_eq!(context.state(), SessionState::Unauthenticated);
        assert!(context.user().is_none());
        assert!(!storage.has_token().await.unwrap());
    }

    #[tokio::test]
    async fn test_logout_survives_storage_failure() {
        let storage = Arc::new(
            MockSessionStorage::with_session(MockAuthPort::token(), Some(user())).fail_on_clear(),
        );
        let mut context = SessionContext::new(storage);
        context.restore(MockAuthPort::token(), user());

        context.logout().await;

        assert_eq!(context.state(), SessionState::Unauthenticated);
        assert!(context.token().is_none());
    }
}
