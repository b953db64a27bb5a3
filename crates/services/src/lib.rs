#![forbid(unsafe_code)]

pub mod app_services;
pub mod auth_service;
pub mod cue;
pub mod error;
pub mod game_loop;
pub mod history_service;
pub mod prompt_service;

pub use sightread_core::Clock;

pub use app_services::{AppServices, AppServicesError};
pub use auth_service::AuthService;
pub use error::{AuthError, GameError, HistoryError};
pub use game_loop::{
    AnswerOutcome, AnswerRecord, GameLoopService, GameSession, GameSnapshot, TickOutcome,
    TickRecord,
};
pub use history_service::HistoryService;
pub use prompt_service::{ActivePrompt, PromptService};
