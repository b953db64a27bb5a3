use std::sync::{Mutex, PoisonError};

use api::{ApiError, AuthApi};
use sightread_core::model::AuthSession;

use crate::error::AuthError;

/// Sign-in state for the app.
///
/// Wraps the auth endpoints and remembers who is signed in; the signed-in
/// session is what gates entry persistence, injected into each game loop at
/// construction.
pub struct AuthService {
    auth_api: AuthApi,
    session: Mutex<Option<AuthSession>>,
}

impl AuthService {
    #[must_use]
    pub fn new(auth_api: AuthApi) -> Self {
        Self {
            auth_api,
            session: Mutex::new(None),
        }
    }

    /// The signed-in user, if any.
    #[must_use]
    pub fn session(&self) -> Option<AuthSession> {
        self.session
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.session().is_some()
    }

    /// Sign in against the main backend.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Api` with the backend's message on rejected
    /// credentials or transport failures.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthSession, AuthError> {
        let outcome = self.auth_api.login(email, password).await?;
        *self.session.lock().unwrap_or_else(PoisonError::into_inner) =
            Some(outcome.session.clone());
        Ok(outcome.session)
    }

    /// Re-resolve the signed-in user from the stored tokens, e.g. at app
    /// start. Clears the session when the tokens are no longer accepted.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::NotSignedIn` without stored tokens.
    pub async fn refresh_user(&self) -> Result<AuthSession, AuthError> {
        match self.auth_api.current_user().await {
            Ok(session) => {
                *self.session.lock().unwrap_or_else(PoisonError::into_inner) =
                    Some(session.clone());
                Ok(session)
            }
            Err(ApiError::NotSignedIn) => Err(AuthError::NotSignedIn),
            Err(err) => {
                *self.session.lock().unwrap_or_else(PoisonError::into_inner) = None;
                Err(err.into())
            }
        }
    }

    /// Sign out locally: drop the session and the token pair.
    pub fn logout(&self) {
        self.auth_api.logout();
        *self.session.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }
}
