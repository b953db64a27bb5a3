mod auth;
mod client;
mod entries;
mod music;

pub use auth::{AuthApi, LoginOutcome};
pub use client::ApiClient;
pub use entries::HttpEntryStore;
pub use music::HttpMusicBackend;
