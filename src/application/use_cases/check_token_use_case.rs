//! Launch-time reconciliation of the persisted session with the backend.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::application::services::{SessionContext, SessionState};
use crate::domain::ports::AuthPort;

/// Re-validates the stored token and settles the session state.
///
/// Fails closed: any error during verification logs the clinician out and
/// clears the persisted session. There is no retry.
pub struct CheckTokenUseCase {
    auth_port: Arc<dyn AuthPort>,
}

impl CheckTokenUseCase {
    #[must_use]
    pub const fn new(auth_port: Arc<dyn AuthPort>) -> Self {
        Self { auth_port }
    }

    /// Runs the check and returns the resulting state.
    pub async fn execute(&self, session: &mut SessionContext) -> SessionState {
        let storage = session.storage();
        let persisted = match storage.load().await {
            Ok(persisted) => persisted,
            Err(e) => {
                warn!(error = %e, "Could not read persisted session");
                session.mark_unauthenticated();
                return session.state();
            }
        };

        let Some(token) = persisted.token else {
            debug!("No persisted token");
            session.mark_unauthenticated();
            return session.state();
        };

        if let Err(e) = self.auth_port.verify_token(&token).await {
            warn!(error = %e, "Persisted token failed verification");
            session.logout().await;
            return session.state();
        }

        let user = match persisted.user {
            Some(user) => user,
            None => match self.auth_port.fetch_current_user(&token).await {
                Ok(user) => {
                    if let Err(e) = storage.store(&token, &user).await {
                        warn!(error = %e, "Could not persist fetched profile");
                    }
                    user
                }
                Err(e) => {
                    warn!(error = %e, "Could not fetch profile for persisted token");
                    session.logout().await;
                    return session.state();
                }
            },
        };

        info!(user_id = %user.id(), "Persisted session verified");
        session.restore(token, user);
        session.state()
    }
}
