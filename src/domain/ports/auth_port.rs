//! Authentication port definition.

use async_trait::async_trait;
use zeroize::Zeroizing;

use crate::domain::entities::{AuthToken, User};
use crate::domain::errors::ApiError;

/// Email and password pair for token issuance.
#[derive(Clone)]
pub struct Credentials {
    pub email: String,
    pub password: Zeroizing<String>,
}

impl Credentials {
    #[must_use]
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into().trim().to_string(),
            password: Zeroizing::new(password.into()),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Account registration payload.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub first_name: String,
    pub last_name: String,
    pub credentials: Credentials,
}

/// Port for backend authentication operations.
#[async_trait]
pub trait AuthPort: Send + Sync {
    /// Exchanges credentials for an access token.
    async fn obtain_token(&self, credentials: &Credentials) -> Result<AuthToken, ApiError>;

    /// Exchanges a Google ID token for a backend access token.
    async fn exchange_google_token(&self, id_token: &str) -> Result<AuthToken, ApiError>;

    /// Checks the token is still accepted by the backend.
    async fn verify_token(&self, token: &AuthToken) -> Result<(), ApiError>;

    /// Returns the profile of the token's owner.
    async fn fetch_current_user(&self, token: &AuthToken) -> Result<User, ApiError>;

    /// Registers a new clinician account.
    async fn create_user(&self, account: &NewAccount) -> Result<(), ApiError>;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    pub const VALID_EMAIL: &str = "ana@clinic.cl";
    pub const VALID_PASSWORD: &str = "s3cret";

    /// Mock authentication port for testing.
    pub struct MockAuthPort {
        accept_token: Arc<AtomicBool>,
        reachable: Arc<AtomicBool>,
        verify_calls: Arc<AtomicUsize>,
        accounts: Mutex<Vec<(String, String)>>,
        user: User,
    }

    impl MockAuthPort {
        /// Creates new mock; `accept_token` drives `verify_token`.
        pub fn new(accept_token: bool) -> Self {
            Self {
                accept_token: Arc::new(AtomicBool::new(accept_token)),
                reachable: Arc::new(AtomicBool::new(true)),
                verify_calls: Arc::new(AtomicUsize::new(0)),
                accounts: Mutex::new(vec![(VALID_EMAIL.to_string(), VALID_PASSWORD.to_string())]),
                user: User::new(7_u64, "Ana", "Rojas", VALID_EMAIL),
            }
        }

        /// Makes every call fail as if the server were down.
        pub fn set_reachable(&self, value: bool) {
            self.reachable.store(value, Ordering::SeqCst);
        }

        pub fn verify_calls(&self) -> usize {
            self.verify_calls.load(Ordering::SeqCst)
        }

        pub fn token() -> AuthToken {
            AuthToken::new_unchecked("header.payload.signature")
        }

        fn check_reachable(&self) -> Result<(), ApiError> {
            if self.reachable.load(Ordering::SeqCst) {
                Ok(())
            } else {
                Err(ApiError::network("mock server down"))
            }
        }
    }

    #[async_trait]
    impl AuthPort for MockAuthPort {
        async fn obtain_token(&self, credentials: &Credentials) -> Result<AuthToken, ApiError> {
            self.check_reachable()?;
            let accounts = self.accounts.lock().unwrap();
            let known = accounts
                .iter()
                .any(|(email, password)| *email == credentials.email && password == credentials.password.as_str());
            if known {
                Ok(Self::token())
            } else {
                Err(ApiError::unauthorized("invalid credentials"))
            }
        }

        async fn exchange_google_token(&self, id_token: &str) -> Result<AuthToken, ApiError> {
            self.check_reachable()?;
            if id_token.is_empty() {
                Err(ApiError::unauthorized("invalid Google token"))
            } else {
                Ok(Self::token())
            }
        }

        async fn verify_token(&self, _token: &AuthToken) -> Result<(), ApiError> {
            self.verify_calls.fetch_add(1, Ordering::SeqCst);
            self.check_reachable()?;
            if self.accept_token.load(Ordering::SeqCst) {
                Ok(())
            } else {
                Err(ApiError::unauthorized("token not valid"))
            }
        }

        async fn fetch_current_user(&self, _token: &AuthToken) -> Result<User, ApiError> {
            self.check_reachable()?;
            Ok(self.user.clone())
        }

        async fn create_user(&self, account: &NewAccount) -> Result<(), ApiError> {
            self.check_reachable()?;
            let mut accounts = self.accounts.lock().unwrap();
            if accounts.iter().any(|(email, _)| *email == account.credentials.email) {
                return Err(ApiError::server(400, "A user with that username already exists."));
            }
            accounts.push((
                account.credentials.email.clone(),
                account.credentials.password.to_string(),
            ));
            Ok(())
        }
    }
}
