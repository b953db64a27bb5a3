mod auth;
mod counters;
mod ids;
pub mod note;
pub mod scale;
pub mod session;
pub mod settings;
mod status;
mod timer;

pub use auth::AuthSession;
pub use counters::ScoreCounters;
pub use ids::{EntryId, UserId};
pub use note::{Accidental, Note, NoteName, NoteParseError, Octave};
pub use scale::{Scale, ScaleParseError};
pub use session::{PracticeEntry, SessionReport, SessionReportError, format_hms};
pub use settings::{GameMode, GameSettings, SettingsError};
pub use status::{GamePhase, GameStatus};
pub use timer::GameTimer;
