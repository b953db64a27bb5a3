use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a session is in its life: not started, running, or finished.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GamePhase {
    #[default]
    Idle,
    Running,
    Finished,
}

impl fmt::Display for GamePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GamePhase::Idle => write!(f, "idle"),
            GamePhase::Running => write!(f, "running"),
            GamePhase::Finished => write!(f, "finished"),
        }
    }
}

/// Session status machine.
///
/// Phase moves only forward along Idle → Running → Finished; the single way
/// back is the explicit `reset` edge, which returns to Idle from any phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GameStatus {
    phase: GamePhase,
}

impl GameStatus {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.phase == GamePhase::Idle
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.phase == GamePhase::Running
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.phase == GamePhase::Finished
    }

    /// Enter Running from Idle or Finished. No-op when already Running; the
    /// orchestrator keeps the forward-only invariant by never starting a
    /// finished session without resetting it first.
    pub fn start(&mut self) {
        if self.phase != GamePhase::Running {
            self.phase = GamePhase::Running;
        }
    }

    /// Enter Finished. Only a running session can end.
    pub fn end(&mut self) {
        if self.phase == GamePhase::Running {
            self.phase = GamePhase::Finished;
        }
    }

    /// Back to Idle from any phase.
    pub fn reset(&mut self) {
        self.phase = GamePhase::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_end_walk_the_phases() {
        let mut status = GameStatus::new();
        assert!(status.is_idle());

        status.start();
        assert!(status.is_running());

        // start is a no-op while running
        status.start();
        assert!(status.is_running());

        status.end();
        assert!(status.is_finished());

        // the holder allows restarting a finished session; the orchestrator
        // resets before it ever does this
        status.start();
        assert!(status.is_running());
    }

    #[test]
    fn end_requires_running() {
        let mut status = GameStatus::new();
        status.end();
        assert!(status.is_idle());
    }

    #[test]
    fn reset_returns_to_idle_from_any_phase() {
        let mut status = GameStatus::new();
        status.start();
        status.end();
        status.reset();
        assert!(status.is_idle());

        // reset is idempotent
        status.reset();
        assert!(status.is_idle());
    }
}
