#![forbid(unsafe_code)]

pub mod config;
pub mod contract;
pub mod error;
pub mod http;

pub use config::{BackendConfig, ConfigError};
pub use contract::{
    EntryStore, InMemoryEntryStore, InMemoryPromptSource, NotePrompt, PromptSource,
};
pub use error::ApiError;
pub use http::{ApiClient, AuthApi, HttpEntryStore, HttpMusicBackend, LoginOutcome};
