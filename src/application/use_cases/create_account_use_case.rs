//! Account registration followed by automatic login.

use std::sync::Arc;

use tracing::{info, warn};

use crate::application::dto::LoginResponse;
use crate::application::services::SessionContext;
use crate::domain::errors::SessionError;
use crate::domain::ports::{AuthPort, NewAccount};

/// Registers a clinician and starts their session.
pub struct CreateAccountUseCase {
    auth_port: Arc<dyn AuthPort>,
}

impl CreateAccountUseCase {
    #[must_use]
    pub const fn new(auth_port: Arc<dyn AuthPort>) -> Self {
        Self { auth_port }
    }

    /// Creates the user, obtains a token, fetches the profile and logs in.
    ///
    /// # Errors
    /// Returns the first failing step's error.
    pub async fn execute(
        &self,
        account: &NewAccount,
        session: &mut SessionContext,
    ) -> Result<LoginResponse, SessionError> {
        self.auth_port
            .create_user(account)
            .await
            .inspect_err(|e| warn!(error = %e, "Account creation failed"))?;
        info!(email = %account.credentials.email, "Account created");

        let token = self.auth_port.obtain_token(&account.credentials).await?;
        let user = self.auth_port.fetch_current_user(&token).await?;

        session.login(token.clone(), user.clone()).await?;
        Ok(LoginResponse::new(token, user))
    }
}
