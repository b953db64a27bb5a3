use std::sync::Arc;

use services::{AppServices, AuthService, HistoryService};

/// What the composition root (the `app` crate) provides to the UI.
pub trait UiApp: Send + Sync {
    fn app_name(&self) -> &str;
    fn services(&self) -> AppServices;
}

/// Handles the views pull out of Dioxus context.
#[derive(Clone)]
pub struct AppContext {
    app_name: String,
    services: AppServices,
}

impl AppContext {
    #[must_use]
    pub fn new(app: &Arc<dyn UiApp>) -> Self {
        Self {
            app_name: app.app_name().to_string(),
            services: app.services(),
        }
    }

    #[must_use]
    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    #[must_use]
    pub fn services(&self) -> AppServices {
        self.services.clone()
    }

    #[must_use]
    pub fn auth(&self) -> Arc<AuthService> {
        self.services.auth()
    }

    #[must_use]
    pub fn history(&self) -> Arc<HistoryService> {
        self.services.history()
    }
}

/// Build an `AppContext` from a UI-facing app implementation.
#[must_use]
pub fn build_app_context(app: &Arc<dyn UiApp>) -> AppContext {
    AppContext::new(app)
}
