//! Authentication DTOs.

use zeroize::Zeroizing;

use crate::domain::entities::{AuthToken, User};
use crate::domain::ports::Credentials;

/// How the clinician authenticates.
#[derive(Clone)]
pub enum LoginMethod {
    /// Email and password against the token endpoint.
    Password(Credentials),
    /// Google ID token exchanged for a backend token.
    Google(Zeroizing<String>),
}

impl LoginMethod {
    /// Returns human-readable description.
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::Password(_) => "email and password",
            Self::Google(_) => "Google account",
        }
    }
}

impl std::fmt::Debug for LoginMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Password(credentials) => f.debug_tuple("Password").field(credentials).finish(),
            Self::Google(_) => f.debug_tuple("Google").field(&"<redacted>").finish(),
        }
    }
}

impl std::fmt::Display for LoginMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.description())
    }
}

/// Login request data.
#[derive(Debug, Clone)]
pub struct LoginRequest {
    pub method: LoginMethod,
}

impl LoginRequest {
    /// Creates a password login request.
    #[must_use]
    pub fn password(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            method: LoginMethod::Password(Credentials::new(email, password)),
        }
    }

    /// Creates a Google login request.
    #[must_use]
    pub fn google(id_token: impl Into<String>) -> Self {
        Self {
            method: LoginMethod::Google(Zeroizing::new(id_token.into().trim().to_string())),
        }
    }
}

/// Login response data.
#[derive(Debug, Clone)]
pub struct LoginResponse {
    pub token: AuthToken,
    pub user: User,
}

impl LoginResponse {
    /// Creates new login response.
    #[must_use]
    pub const fn new(token: AuthToken, user: User) -> Self {
        Self { token, user }
    }
}
