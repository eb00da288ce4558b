//! Errors raised while starting a session.

use thiserror::Error;

use super::{ApiError, StorageError};

/// Login and account creation failures.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("could not save the session: {0}")]
    Storage(#[from] StorageError),
}

impl SessionError {
    /// Message for the login screen.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Api(ApiError::Unauthorized { .. }) => "Invalid email or password.".to_string(),
            Self::Api(ApiError::Network { .. }) => "Could not connect to the server.".to_string(),
            Self::Api(ApiError::Server { status: 400, message }) if !message.is_empty() => {
                message.clone()
            }
            Self::Api(_) => "Server error. Please try again later.".to_string(),
            Self::Storage(_) => "Could not save the session on this device.".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_messages() {
        let invalid = SessionError::from(ApiError::unauthorized("No active account"));
        assert_eq!(invalid.user_message(), "Invalid email or password.");

        let offline = SessionError::from(ApiError::network("refused"));
        assert_eq!(offline.user_message(), "Could not connect to the server.");

        let server = SessionError::from(ApiError::server(500, "boom"));
        assert_eq!(server.user_message(), "Server error. Please try again later.");
    }

    #[test]
    fn test_bad_request_surfaces_backend_message() {
        let taken = SessionError::from(ApiError::server(400, "Username already taken."));
        assert_eq!(taken.user_message(), "Username already taken.");
    }
}
