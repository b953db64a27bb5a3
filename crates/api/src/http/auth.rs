use serde::{Deserialize, Serialize};

use sightread_core::model::{AuthSession, UserId};

use crate::error::ApiError;
use crate::http::client::ApiClient;

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct UserBody {
    id: u64,
    email: String,
    first_name: String,
    last_name: String,
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    user: UserBody,
    access_token: String,
    refresh_token: String,
}

impl From<UserBody> for AuthSession {
    fn from(body: UserBody) -> Self {
        let display_name = format!("{} {}", body.first_name, body.last_name)
            .trim()
            .to_string();
        AuthSession::new(UserId::new(body.id), body.email, display_name)
    }
}

/// Result of a successful login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginOutcome {
    pub session: AuthSession,
}

/// Auth endpoints of the main backend.
#[derive(Clone)]
pub struct AuthApi {
    client: ApiClient,
}

impl AuthApi {
    #[must_use]
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Sign in and install the issued token pair on the shared client.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Backend` with the backend's message on rejected
    /// credentials, or `ApiError::Http` for transport failures.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginOutcome, ApiError> {
        let response = self
            .client
            .transport()
            .post(self.client.config().main_endpoint("api/auth/login"))
            .json(&LoginRequest { email, password })
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(ApiError::from_response(response).await);
        }

        let body: LoginResponse = response.json().await?;
        self.client
            .store_tokens(body.access_token, body.refresh_token);
        Ok(LoginOutcome {
            session: body.user.into(),
        })
    }

    /// Who the current token pair belongs to.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotSignedIn` without a token pair, and clears the
    /// pair if the backend no longer accepts it.
    pub async fn current_user(&self) -> Result<AuthSession, ApiError> {
        if !self.client.is_signed_in() {
            return Err(ApiError::NotSignedIn);
        }
        let request = self
            .client
            .transport()
            .get(self.client.config().main_endpoint("api/auth/me"))
            .build()?;
        let response = self.client.send(request).await?;
        if !response.status().is_success() {
            self.client.clear_tokens();
            return Err(ApiError::from_response(response).await);
        }
        let body: UserBody = response.json().await?;
        Ok(body.into())
    }

    /// Drop the token pair. Purely local; the backend keeps no session.
    pub fn logout(&self) {
        self.client.clear_tokens();
    }
}
