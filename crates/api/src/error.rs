//! Shared error type for the remote collaborators.

use thiserror::Error;

/// Errors surfaced by the backend adapters.
///
/// The game's state machine never sees these; call sites log and move on.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ApiError {
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error("request failed with status {0}")]
    Status(reqwest::StatusCode),

    #[error("backend error: {message}")]
    Backend { message: String },

    #[error("session expired")]
    SessionExpired,

    #[error("not signed in")]
    NotSignedIn,

    #[error("malformed backend payload: {0}")]
    Malformed(String),
}

impl ApiError {
    /// Pull a `{"error": "..."}` payload out of a failed response, falling
    /// back to the bare status code.
    pub(crate) async fn from_response(response: reqwest::Response) -> Self {
        let status = response.status();
        match response.json::<ErrorBody>().await {
            Ok(body) if !body.error.is_empty() => ApiError::Backend {
                message: body.error,
            },
            _ => ApiError::Status(status),
        }
    }
}

#[derive(Debug, serde::Deserialize)]
pub(crate) struct ErrorBody {
    pub error: String,
}
