use std::sync::{Arc, Mutex};

use reqwest::StatusCode;
use reqwest::header::{AUTHORIZATION, HeaderValue};
use serde::{Deserialize, Serialize};

use crate::config::BackendConfig;
use crate::error::ApiError;

//
// ─── TOKEN STORE ───────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, PartialEq, Eq)]
struct Tokens {
    access: String,
    refresh: String,
}

/// Holds the JWT pair for the main backend.
///
/// The access token authenticates requests; the refresh token buys a new
/// access token when the old one expires. When the refresh token itself is
/// expired both are cleared and the user has to sign in again.
#[derive(Debug, Default)]
pub(crate) struct TokenStore {
    tokens: Mutex<Option<Tokens>>,
}

impl TokenStore {
    pub(crate) fn set(&self, access: String, refresh: String) {
        if let Ok(mut guard) = self.tokens.lock() {
            *guard = Some(Tokens { access, refresh });
        }
    }

    pub(crate) fn set_access(&self, access: String) {
        if let Ok(mut guard) = self.tokens.lock()
            && let Some(tokens) = guard.as_mut()
        {
            tokens.access = access;
        }
    }

    pub(crate) fn clear(&self) {
        if let Ok(mut guard) = self.tokens.lock() {
            *guard = None;
        }
    }

    pub(crate) fn access(&self) -> Option<String> {
        self.tokens
            .lock()
            .ok()
            .and_then(|guard| guard.as_ref().map(|t| t.access.clone()))
    }

    pub(crate) fn refresh(&self) -> Option<String> {
        self.tokens
            .lock()
            .ok()
            .and_then(|guard| guard.as_ref().map(|t| t.refresh.clone()))
    }

    pub(crate) fn is_signed_in(&self) -> bool {
        self.tokens.lock().map(|g| g.is_some()).unwrap_or(false)
    }
}

//
// ─── CLIENT ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Serialize)]
struct RefreshRequest {
    refresh_token: String,
}

#[derive(Debug, Deserialize)]
struct RefreshResponse {
    access_token: String,
}

/// Shared HTTP client for the main backend.
///
/// Every request goes out with the current access token; a 401 response
/// triggers one token refresh and one retry of the original request. A
/// second 401 is handed back as-is, with the token pair cleared, so callers
/// surface the signed-out state instead of looping.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    config: BackendConfig,
    tokens: Arc<TokenStore>,
}

impl ApiClient {
    #[must_use]
    pub fn new(config: BackendConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
            tokens: Arc::new(TokenStore::default()),
        }
    }

    #[must_use]
    pub fn config(&self) -> &BackendConfig {
        &self.config
    }

    /// The underlying transport, for adapters that talk to backends outside
    /// the main one (the music backend is unauthenticated).
    #[must_use]
    pub fn transport(&self) -> reqwest::Client {
        self.http.clone()
    }

    #[must_use]
    pub fn is_signed_in(&self) -> bool {
        self.tokens.is_signed_in()
    }

    /// Install a freshly issued token pair (after login).
    pub fn store_tokens(&self, access: String, refresh: String) {
        self.tokens.set(access, refresh);
    }

    /// Drop both tokens (logout, or refresh-token expiry).
    pub fn clear_tokens(&self) {
        self.tokens.clear();
    }

    /// Send an authenticated request, refreshing the access token once on a
    /// 401 and retrying.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Http` for transport failures. HTTP error statuses
    /// are returned as successful responses for the caller to interpret.
    pub(crate) async fn send(
        &self,
        request: reqwest::Request,
    ) -> Result<reqwest::Response, ApiError> {
        let retry = request.try_clone();
        let response = self.http.execute(self.authorize(request)).await?;
        if response.status() != StatusCode::UNAUTHORIZED {
            return Ok(response);
        }

        // One shot at refreshing. Streaming bodies cannot be cloned; those
        // requests surface the 401 directly.
        let Some(retry) = retry else {
            return Ok(response);
        };
        match self.refresh_access_token().await {
            Ok(()) => Ok(self.http.execute(self.authorize(retry)).await?),
            Err(err) => {
                self.tokens.clear();
                tracing::debug!(error = %err, "token refresh failed, keeping original 401");
                Ok(response)
            }
        }
    }

    fn authorize(&self, mut request: reqwest::Request) -> reqwest::Request {
        if let Some(access) = self.tokens.access()
            && let Ok(value) = HeaderValue::from_str(&format!("Bearer {access}"))
        {
            request.headers_mut().insert(AUTHORIZATION, value);
        }
        request
    }

    async fn refresh_access_token(&self) -> Result<(), ApiError> {
        let refresh_token = self.tokens.refresh().ok_or(ApiError::SessionExpired)?;
        let response = self
            .http
            .post(self.config.main_endpoint("api/auth/refresh"))
            .json(&RefreshRequest { refresh_token })
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(ApiError::SessionExpired);
        }
        let body: RefreshResponse = response.json().await?;
        self.tokens.set_access(body.access_token);
        Ok(())
    }
}
