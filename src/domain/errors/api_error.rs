//! Backend API error types.

use thiserror::Error;

/// Failure taxonomy for calls to the CuraMetric backend.
#[derive(Debug, Error)]
#[allow(missing_docs)]
pub enum ApiError {
    #[error("could not reach the server: {message}")]
    Network { message: String },

    #[error("authentication rejected: {message}")]
    Unauthorized { message: String },

    #[error("permission denied: {message}")]
    Forbidden { message: String },

    #[error("resource not found: {message}")]
    NotFound { message: String },

    #[error("server error ({status}): {message}")]
    Server { status: u16, message: String },

    #[error("malformed server response: {message}")]
    MalformedResponse { message: String },

    #[error("no active session")]
    NoSession,

    #[error("unexpected client error: {message}")]
    Unexpected { message: String },
}

impl ApiError {
    /// Creates network error.
    #[must_use]
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    /// Creates unauthorized error.
    #[must_use]
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized {
            message: message.into(),
        }
    }

    /// Creates forbidden error.
    #[must_use]
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden {
            message: message.into(),
        }
    }

    /// Creates server error.
    #[must_use]
    pub fn server(status: u16, message: impl Into<String>) -> Self {
        Self::Server {
            status,
            message: message.into(),
        }
    }

    /// Creates malformed response error.
    #[must_use]
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedResponse {
            message: message.into(),
        }
    }

    /// Creates unexpected error.
    #[must_use]
    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::Unexpected {
            message: message.into(),
        }
    }

    /// Returns whether the UI should offer a retry.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::Network { .. }
                | Self::Server { .. }
                | Self::MalformedResponse { .. }
                | Self::NotFound { .. }
        )
    }

    /// Returns whether the error must end the session.
    #[must_use]
    pub const fn requires_logout(&self) -> bool {
        matches!(self, Self::Unauthorized { .. } | Self::NoSession)
    }

    /// Returns whether error is network related.
    #[must_use]
    pub const fn is_network_error(&self) -> bool {
        matches!(self, Self::Network { .. })
    }

    /// Returns the message shown to the clinician.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Network { .. } => "Could not connect to the server. Please try again.".to_string(),
            Self::Unauthorized { .. } | Self::NoSession => {
                "Your session is no longer valid. Please log in again.".to_string()
            }
            Self::Forbidden { .. } => {
                "You do not have permission for this action. Check your account or contact the administrator."
                    .to_string()
            }
            Self::NotFound { .. } => "The requested record was not found.".to_string(),
            Self::Server { .. } | Self::MalformedResponse { .. } | Self::Unexpected { .. } => {
                "Server error. Please try again later.".to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unauthorized_forces_logout() {
        let error = ApiError::unauthorized("expired");
        assert!(error.requires_logout());
        assert!(!error.is_recoverable());
    }

    #[test]
    fn test_network_and_server_are_retryable() {
        assert!(ApiError::network("refused").is_recoverable());
        assert!(ApiError::server(502, "bad gateway").is_recoverable());
        assert!(!ApiError::forbidden("nope").is_recoverable());
        assert!(!ApiError::forbidden("nope").requires_logout());
    }

    #[test]
    fn test_user_message_does_not_leak_details() {
        let error = ApiError::server(500, "Traceback: KeyError 'rut'");
        assert!(!error.user_message().contains("Traceback"));
    }
}
