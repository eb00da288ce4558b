//! Login use case implementation.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::application::dto::{LoginMethod, LoginRequest, LoginResponse};
use crate::application::services::SessionContext;
use crate::domain::errors::{ApiError, SessionError};
use crate::domain::ports::AuthPort;

/// Handles clinician authentication workflow.
#[derive(Clone)]
pub struct LoginUseCase {
    auth_port: Arc<dyn AuthPort>,
}

impl LoginUseCase {
    /// Creates new login use case.
    #[must_use]
    pub const fn new(auth_port: Arc<dyn AuthPort>) -> Self {
        Self { auth_port }
    }

    /// Obtains a token, fetches the profile and starts the session.
    ///
    /// # Errors
    /// Returns error if the backend rejects the login or the session cannot be saved.
    pub async fn execute(
        &self,
        request: LoginRequest,
        session: &mut SessionContext,
    ) -> Result<LoginResponse, SessionError> {
        debug!(method = %request.method, "Attempting login");

        let token = match &request.method {
            LoginMethod::Password(credentials) => {
                if credentials.email.is_empty() || credentials.password.is_empty() {
                    return Err(ApiError::unauthorized("missing credentials").into());
                }
                self.auth_port.obtain_token(credentials).await
            }
            LoginMethod::Google(id_token) => self.auth_port.exchange_google_token(id_token).await,
        }
        .inspect_err(|e| warn!(error = %e, "Token request failed"))?;

        let user = self
            .auth_port
            .fetch_current_user(&token)
            .await
            .inspect_err(|e| warn!(error = %e, "Profile request failed"))?;

        info!(user_id = %user.id(), method = %request.method, "Successfully authenticated");

        session.login(token.clone(), user.clone()).await?;
        Ok(LoginResponse::new(token, user))
    }
}
