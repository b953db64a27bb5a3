use std::sync::Arc;

use thiserror::Error;

use api::{
    ApiClient, AuthApi, BackendConfig, ConfigError, EntryStore, HttpEntryStore, HttpMusicBackend,
    PromptSource,
};
use sightread_core::Clock;
use sightread_core::model::AuthSession;

use crate::auth_service::AuthService;
use crate::game_loop::GameLoopService;
use crate::history_service::HistoryService;
use crate::prompt_service::PromptService;

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Assembles the service graph for the app.
///
/// Both backends share one transport; game loops are created per practice
/// view with the auth session current at that moment.
#[derive(Clone)]
pub struct AppServices {
    clock: Clock,
    prompt_source: Arc<dyn PromptSource>,
    entry_store: Arc<dyn EntryStore>,
    auth: Arc<AuthService>,
    history: Arc<HistoryService>,
}

impl AppServices {
    /// Build services against the configured remote backends.
    pub fn new_remote(config: BackendConfig, clock: Clock) -> Self {
        let client = ApiClient::new(config.clone());
        let prompt_source: Arc<dyn PromptSource> =
            Arc::new(HttpMusicBackend::new(client.transport(), config));
        let entry_store: Arc<dyn EntryStore> = Arc::new(HttpEntryStore::new(client.clone()));
        let auth = Arc::new(AuthService::new(AuthApi::new(client)));
        Self::with_backends(clock, prompt_source, entry_store, auth)
    }

    /// Build services from the environment.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError::Config` for missing or malformed backend
    /// URLs.
    pub fn from_env(clock: Clock) -> Result<Self, AppServicesError> {
        Ok(Self::new_remote(BackendConfig::from_env()?, clock))
    }

    /// Wire explicit collaborators; tests use this with the in-memory fakes.
    #[must_use]
    pub fn with_backends(
        clock: Clock,
        prompt_source: Arc<dyn PromptSource>,
        entry_store: Arc<dyn EntryStore>,
        auth: Arc<AuthService>,
    ) -> Self {
        let history = Arc::new(HistoryService::new(Arc::clone(&entry_store)));
        Self {
            clock,
            prompt_source,
            entry_store,
            auth,
            history,
        }
    }

    #[must_use]
    pub fn clock(&self) -> Clock {
        self.clock
    }

    #[must_use]
    pub fn auth(&self) -> Arc<AuthService> {
        Arc::clone(&self.auth)
    }

    #[must_use]
    pub fn history(&self) -> Arc<HistoryService> {
        Arc::clone(&self.history)
    }

    /// A fresh game loop for one mounted practice view.
    #[must_use]
    pub fn new_game(&self, auth: Option<AuthSession>) -> GameLoopService {
        let prompts = Arc::new(PromptService::new(Arc::clone(&self.prompt_source)));
        GameLoopService::new(self.clock, prompts, Arc::clone(&self.entry_store), auth)
    }
}
