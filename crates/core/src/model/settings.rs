use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::model::note::Octave;
use crate::model::scale::Scale;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SettingsError {
    #[error("time limit must be > 0 seconds")]
    InvalidTimeLimit,

    #[error("note limit must be > 0")]
    InvalidNoteLimit,
}

//
// ─── GAME MODE ─────────────────────────────────────────────────────────────────
//

/// What bounds a session: wall-clock time or answer count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameMode {
    Time,
    Notes,
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameMode::Time => write!(f, "time"),
            GameMode::Notes => write!(f, "notes"),
        }
    }
}

//
// ─── SETTINGS ──────────────────────────────────────────────────────────────────
//

/// User-chosen session parameters.
///
/// Cold state: it only changes when the user touches the settings panel, and
/// any change while a session is running discards that session. Values are
/// constrained by the closed option lists the panel offers; the only
/// validation here is that limits stay positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameSettings {
    mode: GameMode,
    time_limit_secs: u32,
    note_limit: u32,
    scale: Scale,
    octave: Octave,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            mode: GameMode::Time,
            time_limit_secs: 30,
            note_limit: 25,
            scale: Scale::C,
            octave: Octave::new(4).expect("default octave is in range"),
        }
    }
}

impl GameSettings {
    /// Creates settings with explicit values.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError` when either limit is zero.
    pub fn new(
        mode: GameMode,
        time_limit_secs: u32,
        note_limit: u32,
        scale: Scale,
        octave: Octave,
    ) -> Result<Self, SettingsError> {
        if time_limit_secs == 0 {
            return Err(SettingsError::InvalidTimeLimit);
        }
        if note_limit == 0 {
            return Err(SettingsError::InvalidNoteLimit);
        }
        Ok(Self {
            mode,
            time_limit_secs,
            note_limit,
            scale,
            octave,
        })
    }

    #[must_use]
    pub fn mode(&self) -> GameMode {
        self.mode
    }

    #[must_use]
    pub fn time_limit_secs(&self) -> u32 {
        self.time_limit_secs
    }

    #[must_use]
    pub fn note_limit(&self) -> u32 {
        self.note_limit
    }

    #[must_use]
    pub fn scale(&self) -> Scale {
        self.scale
    }

    #[must_use]
    pub fn octave(&self) -> Octave {
        self.octave
    }

    /// The active limit for the current mode.
    #[must_use]
    pub fn limit(&self) -> u32 {
        match self.mode {
            GameMode::Time => self.time_limit_secs,
            GameMode::Notes => self.note_limit,
        }
    }

    pub fn set_mode(&mut self, mode: GameMode) {
        self.mode = mode;
    }

    /// # Errors
    ///
    /// Returns `SettingsError::InvalidTimeLimit` for zero.
    pub fn set_time_limit_secs(&mut self, secs: u32) -> Result<(), SettingsError> {
        if secs == 0 {
            return Err(SettingsError::InvalidTimeLimit);
        }
        self.time_limit_secs = secs;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `SettingsError::InvalidNoteLimit` for zero.
    pub fn set_note_limit(&mut self, limit: u32) -> Result<(), SettingsError> {
        if limit == 0 {
            return Err(SettingsError::InvalidNoteLimit);
        }
        self.note_limit = limit;
        Ok(())
    }

    pub fn set_scale(&mut self, scale: Scale) {
        self.scale = scale;
    }

    pub fn set_octave(&mut self, octave: Octave) {
        self.octave = octave;
    }
}
