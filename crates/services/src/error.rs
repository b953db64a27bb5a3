//! Shared error types for the services crate.

use thiserror::Error;

use api::ApiError;
use sightread_core::model::settings::SettingsError;

/// Errors emitted by `GameLoopService`.
///
/// The session state machine itself cannot fail; the only fallible surface
/// is feeding it invalid settings values.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GameError {
    #[error(transparent)]
    Settings(#[from] SettingsError),
}

/// Errors emitted by `HistoryService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum HistoryError {
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Errors emitted by `AuthService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AuthError {
    #[error("not signed in")]
    NotSignedIn,
    #[error(transparent)]
    Api(#[from] ApiError),
}
