use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use api::EntryStore;
use sightread_core::Clock;
use sightread_core::model::{
    AuthSession, EntryId, GameMode, GamePhase, GameSettings, GameStatus, GameTimer, NoteName,
    Octave, Scale, ScoreCounters, SessionReport,
};

use crate::error::GameError;
use crate::prompt_service::{ActivePrompt, PromptService};

//
// ─── SESSION STATE MACHINE ─────────────────────────────────────────────────────
//

/// Result of feeding one answer into the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnswerRecord {
    /// False when the session was already finished and the answer ignored.
    pub counted: bool,
    pub is_correct: bool,
    /// True when this answer pushed the session over its limit.
    pub just_finished: bool,
    pub elapsed_secs: i64,
}

/// Result of one timer poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickRecord {
    pub elapsed_secs: i64,
    /// True when this poll crossed the time limit.
    pub just_finished: bool,
}

/// One practice session: settings, status, timer, counters.
///
/// Pure state machine; time comes in as a parameter and side effects
/// (prompt fetching, persistence) live in `GameLoopService`. Within one
/// answer the order is fixed: count, then end-condition check, then the
/// finished transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSession {
    settings: GameSettings,
    status: GameStatus,
    timer: GameTimer,
    counters: ScoreCounters,
}

impl GameSession {
    #[must_use]
    pub fn new(settings: GameSettings) -> Self {
        Self {
            settings,
            status: GameStatus::new(),
            timer: GameTimer::new(),
            counters: ScoreCounters::new(),
        }
    }

    #[must_use]
    pub fn settings(&self) -> &GameSettings {
        &self.settings
    }

    #[must_use]
    pub fn phase(&self) -> GamePhase {
        self.status.phase()
    }

    #[must_use]
    pub fn counters(&self) -> ScoreCounters {
        self.counters
    }

    #[must_use]
    pub fn elapsed_secs(&self, now_epoch: i64) -> i64 {
        self.timer.elapsed_secs(now_epoch)
    }

    /// Seconds left in time mode; the full note limit in count mode makes no
    /// sense here, so callers display the counter instead.
    #[must_use]
    pub fn remaining_secs(&self, now_epoch: i64) -> i64 {
        self.timer
            .remaining_secs(self.settings.time_limit_secs(), now_epoch)
    }

    #[must_use]
    pub fn started_at(&self) -> Option<i64> {
        self.timer.started_at()
    }

    /// Feed one answer. The very first answer starts the session and the
    /// timer; every counted answer re-checks the end condition.
    pub fn answer(
        &mut self,
        answer: NoteName,
        prompt: Option<NoteName>,
        now_epoch: i64,
    ) -> AnswerRecord {
        if self.status.is_finished() {
            return AnswerRecord {
                counted: false,
                is_correct: false,
                just_finished: false,
                elapsed_secs: self.timer.elapsed_secs(now_epoch),
            };
        }

        if !self.status.is_running() {
            self.status.start();
            self.timer.start(now_epoch);
        }

        // No prompt on screen (a failed fetch) counts as a miss, matching
        // the totals the player saw.
        let is_correct = prompt.is_some_and(|note| note == answer);
        self.counters.record(is_correct);

        let just_finished = self.check_end(now_epoch);
        AnswerRecord {
            counted: true,
            is_correct,
            just_finished,
            elapsed_secs: self.timer.elapsed_secs(now_epoch),
        }
    }

    /// Timer poll. Only time-bounded sessions can end here.
    pub fn tick(&mut self, now_epoch: i64) -> TickRecord {
        let just_finished = self.status.is_running() && self.check_end(now_epoch);
        TickRecord {
            elapsed_secs: self.timer.elapsed_secs(now_epoch),
            just_finished,
        }
    }

    fn check_end(&mut self, now_epoch: i64) -> bool {
        if !self.status.is_running() {
            return false;
        }
        let over = match self.settings.mode() {
            GameMode::Time => {
                self.timer.elapsed_secs(now_epoch) >= i64::from(self.settings.time_limit_secs())
            }
            GameMode::Notes => self.counters.total() >= self.settings.note_limit(),
        };
        if over {
            self.status.end();
        }
        over
    }

    /// Back to Idle with everything zeroed. Settings are kept.
    pub fn reset(&mut self) {
        self.status.reset();
        self.timer.reset();
        self.counters.reset();
    }

    /// Apply a new mode; returns false (and does nothing) for the current
    /// value. A change resets the session as part of the setter itself.
    pub fn set_mode(&mut self, mode: GameMode) -> bool {
        if self.settings.mode() == mode {
            return false;
        }
        self.settings.set_mode(mode);
        self.reset();
        true
    }

    /// Apply a new time limit, resetting on change.
    ///
    /// # Errors
    ///
    /// Returns `GameError::Settings` for a zero limit.
    pub fn set_time_limit_secs(&mut self, secs: u32) -> Result<bool, GameError> {
        if self.settings.time_limit_secs() == secs {
            return Ok(false);
        }
        self.settings.set_time_limit_secs(secs)?;
        self.reset();
        Ok(true)
    }

    /// Apply a new note limit, resetting on change.
    ///
    /// # Errors
    ///
    /// Returns `GameError::Settings` for a zero limit.
    pub fn set_note_limit(&mut self, limit: u32) -> Result<bool, GameError> {
        if self.settings.note_limit() == limit {
            return Ok(false);
        }
        self.settings.set_note_limit(limit)?;
        self.reset();
        Ok(true)
    }

    /// Apply a new scale, resetting on change.
    pub fn set_scale(&mut self, scale: Scale) -> bool {
        if self.settings.scale() == scale {
            return false;
        }
        self.settings.set_scale(scale);
        self.reset();
        true
    }

    /// Apply a new octave, resetting on change.
    pub fn set_octave(&mut self, octave: Octave) -> bool {
        if self.settings.octave() == octave {
            return false;
        }
        self.settings.set_octave(octave);
        self.reset();
        true
    }
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new(GameSettings::default())
    }
}

//
// ─── SNAPSHOT ──────────────────────────────────────────────────────────────────
//

/// Everything the view needs to render one frame of the game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSnapshot {
    pub phase: GamePhase,
    pub settings: GameSettings,
    pub total: u32,
    pub correct: u32,
    pub accuracy: u32,
    pub notes_per_minute: u32,
    pub elapsed_secs: i64,
    pub remaining_secs: i64,
    pub prompt: Option<ActivePrompt>,
    pub saved_entry: Option<EntryId>,
}

/// What one answer did, for the view: play a cue, flip to the score screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerOutcome {
    pub counted: bool,
    pub is_correct: bool,
    pub just_finished: bool,
    pub cue: Option<&'static str>,
}

/// One poll of the game clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickOutcome {
    pub elapsed_secs: i64,
    pub just_finished: bool,
}

//
// ─── ORCHESTRATOR ──────────────────────────────────────────────────────────────
//

struct LoopState {
    session: GameSession,
    persist_started: bool,
    saved_entry: Option<EntryId>,
}

/// Owns one practice run end to end: the session state machine, the prompt
/// feed, and the finished-entry persistence.
///
/// Collaborator failures never propagate out of here; a session whose entry
/// fails to save still finishes on screen, with the failure in the logs.
#[derive(Clone)]
pub struct GameLoopService {
    clock: Clock,
    prompts: Arc<PromptService>,
    entries: Arc<dyn EntryStore>,
    auth: Option<AuthSession>,
    state: Arc<Mutex<LoopState>>,
}

impl GameLoopService {
    #[must_use]
    pub fn new(
        clock: Clock,
        prompts: Arc<PromptService>,
        entries: Arc<dyn EntryStore>,
        auth: Option<AuthSession>,
    ) -> Self {
        Self {
            clock,
            prompts,
            entries,
            auth,
            state: Arc::new(Mutex::new(LoopState {
                session: GameSession::default(),
                persist_started: false,
                saved_entry: None,
            })),
        }
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.auth.is_some()
    }

    /// Current state of the whole game for rendering.
    #[must_use]
    pub fn snapshot(&self) -> GameSnapshot {
        let now = self.clock.now_epoch();
        let state = self.lock();
        let session = &state.session;
        let counters = session.counters();
        let elapsed = session.elapsed_secs(now);
        GameSnapshot {
            phase: session.phase(),
            settings: *session.settings(),
            total: counters.total(),
            correct: counters.correct(),
            accuracy: counters.accuracy(),
            notes_per_minute: counters.notes_per_minute(elapsed),
            elapsed_secs: elapsed,
            remaining_secs: session.remaining_secs(now),
            prompt: self.prompts.current(),
            saved_entry: state.saved_entry,
        }
    }

    /// Feed one answer through the session, then either persist (if the
    /// session just ended) or fetch the next prompt.
    pub async fn handle_answer(&self, answer: NoteName) -> AnswerOutcome {
        let now = self.clock.now_epoch();
        let (record, cue, report) = {
            let mut state = self.lock();
            let prompt = self.prompts.current();
            let prompt_note = prompt.as_ref().map(|p| p.prompt.note.name);
            let record = state.session.answer(answer, prompt_note, now);

            let cue = if record.counted && record.is_correct {
                prompt.and_then(|p| p.cue)
            } else {
                None
            };
            let report = if record.just_finished {
                self.claim_report(&mut state, record.elapsed_secs)
            } else {
                None
            };
            (record, cue, report)
        };

        if record.just_finished {
            self.prompts.suspend();
            self.persist(report).await;
        } else if record.counted {
            let (scale, octave) = self.prompt_key();
            self.prompts.refresh(scale, octave).await;
        }

        AnswerOutcome {
            counted: record.counted,
            is_correct: record.is_correct,
            just_finished: record.just_finished,
            cue,
        }
    }

    /// Timer poll; drives the time-mode end condition so a session can end
    /// with no further input.
    pub async fn tick(&self) -> TickOutcome {
        let now = self.clock.now_epoch();
        let (record, report) = {
            let mut state = self.lock();
            let record = state.session.tick(now);
            let report = if record.just_finished {
                self.claim_report(&mut state, record.elapsed_secs)
            } else {
                None
            };
            (record, report)
        };

        if record.just_finished {
            self.prompts.suspend();
            self.persist(report).await;
        }

        TickOutcome {
            elapsed_secs: record.elapsed_secs,
            just_finished: record.just_finished,
        }
    }

    /// Discard the current session and start fresh with a new prompt.
    pub async fn reset_game(&self) {
        {
            let mut state = self.lock();
            state.session.reset();
            state.persist_started = false;
            state.saved_entry = None;
        }
        self.prompts.resume();
        let (scale, octave) = self.prompt_key();
        self.prompts.refresh(scale, octave).await;
    }

    /// Change the mode. A running session is discarded, not persisted.
    pub async fn set_mode(&self, mode: GameMode) {
        let changed = self.lock().session.set_mode(mode);
        if changed {
            self.after_settings_reset().await;
        }
    }

    /// Change the time limit.
    ///
    /// # Errors
    ///
    /// Returns `GameError::Settings` for a zero limit.
    pub async fn set_time_limit_secs(&self, secs: u32) -> Result<(), GameError> {
        let changed = self.lock().session.set_time_limit_secs(secs)?;
        if changed {
            self.after_settings_reset().await;
        }
        Ok(())
    }

    /// Change the note limit.
    ///
    /// # Errors
    ///
    /// Returns `GameError::Settings` for a zero limit.
    pub async fn set_note_limit(&self, limit: u32) -> Result<(), GameError> {
        let changed = self.lock().session.set_note_limit(limit)?;
        if changed {
            self.after_settings_reset().await;
        }
        Ok(())
    }

    /// Change the scale. A running session is discarded, not persisted.
    pub async fn set_scale(&self, scale: Scale) {
        let changed = self.lock().session.set_scale(scale);
        if changed {
            self.after_settings_reset().await;
        }
    }

    /// Change the octave. A running session is discarded, not persisted.
    pub async fn set_octave(&self, octave: Octave) {
        let changed = self.lock().session.set_octave(octave);
        if changed {
            self.after_settings_reset().await;
        }
    }

    async fn after_settings_reset(&self) {
        {
            let mut state = self.lock();
            state.persist_started = false;
            state.saved_entry = None;
        }
        self.prompts.resume();
        let (scale, octave) = self.prompt_key();
        self.prompts.refresh(scale, octave).await;
    }

    /// Build the report for a just-finished session, claiming the one
    /// persistence slot. Returns None when persistence is skipped: signed
    /// out, empty session, or already dispatched.
    fn claim_report(
        &self,
        state: &mut MutexGuard<'_, LoopState>,
        elapsed_secs: i64,
    ) -> Option<SessionReport> {
        if state.persist_started {
            return None;
        }
        let auth = self.auth.as_ref()?;
        let counters = state.session.counters();
        if counters.total() == 0 {
            return None;
        }
        let report = SessionReport::new(
            auth.user_id,
            elapsed_secs,
            counters.total(),
            counters.correct(),
            counters.notes_per_minute(elapsed_secs),
        )
        .ok()?;
        state.persist_started = true;
        Some(report)
    }

    async fn persist(&self, report: Option<SessionReport>) {
        let Some(report) = report else {
            return;
        };
        match self.entries.save_entry(&report).await {
            Ok(id) => {
                self.lock().saved_entry = Some(id);
                tracing::info!(entry_id = %id, "practice entry saved");
            }
            Err(err) => {
                tracing::warn!(error = %err, "failed to save practice entry");
            }
        }
    }

    fn prompt_key(&self) -> (Scale, Octave) {
        let state = self.lock();
        let settings = state.session.settings();
        (settings.scale(), settings.octave())
    }

    // Single writer; recover a poisoned lock instead of cascading the panic.
    fn lock(&self) -> MutexGuard<'_, LoopState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use sightread_core::time::FIXED_TEST_TIMESTAMP;

    const T0: i64 = FIXED_TEST_TIMESTAMP;

    fn name(s: &str) -> NoteName {
        s.parse().unwrap()
    }

    fn time_session(limit: u32) -> GameSession {
        let settings = GameSettings::new(
            GameMode::Time,
            limit,
            25,
            Scale::C,
            Octave::new(4).unwrap(),
        )
        .unwrap();
        GameSession::new(settings)
    }

    fn notes_session(limit: u32) -> GameSession {
        let settings = GameSettings::new(
            GameMode::Notes,
            30,
            limit,
            Scale::C,
            Octave::new(4).unwrap(),
        )
        .unwrap();
        GameSession::new(settings)
    }

    #[test]
    fn first_answer_starts_session_and_timer() {
        let mut session = time_session(30);
        assert_eq!(session.phase(), GamePhase::Idle);

        let record = session.answer(name("C"), Some(name("C")), T0);
        assert!(record.counted);
        assert!(record.is_correct);
        assert_eq!(session.phase(), GamePhase::Running);
        assert_eq!(session.started_at(), Some(T0));
    }

    #[test]
    fn wrong_and_missing_prompts_count_as_misses() {
        let mut session = notes_session(10);
        let wrong = session.answer(name("D"), Some(name("C")), T0);
        assert!(!wrong.is_correct);

        let missing = session.answer(name("C"), None, T0);
        assert!(missing.counted);
        assert!(!missing.is_correct);
        assert_eq!(session.counters().total(), 2);
        assert_eq!(session.counters().correct(), 0);
    }

    #[test]
    fn enharmonic_answer_matches_prompt() {
        let mut session = notes_session(10);
        let record = session.answer(name("D-"), Some(name("C#")), T0);
        assert!(record.is_correct);
    }

    #[test]
    fn time_mode_ends_at_limit_not_before() {
        let mut session = time_session(30);
        session.answer(name("C"), Some(name("C")), T0);

        let early = session.tick(T0 + 29);
        assert!(!early.just_finished);
        assert_eq!(session.phase(), GamePhase::Running);

        let at_limit = session.tick(T0 + 30);
        assert!(at_limit.just_finished);
        assert_eq!(session.phase(), GamePhase::Finished);

        // a later poll does not finish twice
        let after = session.tick(T0 + 31);
        assert!(!after.just_finished);
    }

    #[test]
    fn notes_mode_ends_on_nth_answer() {
        let mut session = notes_session(10);
        for i in 0..9 {
            let record = session.answer(name("C"), Some(name("C")), T0 + i);
            assert!(!record.just_finished);
        }
        assert_eq!(session.phase(), GamePhase::Running);

        let tenth = session.answer(name("C"), Some(name("C")), T0 + 9);
        assert!(tenth.just_finished);
        assert_eq!(session.phase(), GamePhase::Finished);

        // answers after the end are ignored
        let ignored = session.answer(name("C"), Some(name("C")), T0 + 10);
        assert!(!ignored.counted);
        assert_eq!(session.counters().total(), 10);
    }

    #[test]
    fn fifteen_second_scenario_matches_expected_score() {
        // mode=time limit=15; answers at t=2 correct, t=5 wrong, t=9 correct
        let mut session = time_session(15);
        session.answer(name("C"), Some(name("C")), T0 + 2);
        session.answer(name("D"), Some(name("C")), T0 + 5);
        session.answer(name("C"), Some(name("C")), T0 + 9);

        let counters = session.counters();
        assert_eq!(counters.total(), 3);
        assert_eq!(counters.correct(), 2);
        assert_eq!(counters.accuracy(), 67);
        assert_eq!(session.phase(), GamePhase::Running);

        // timer started at the first answer, so the limit lands at t0+2+15
        let done = session.tick(T0 + 2 + 15);
        assert!(done.just_finished);
        assert_eq!(done.elapsed_secs, 15);
        assert_eq!(counters.notes_per_minute(done.elapsed_secs), 12);
    }

    #[test]
    fn setting_change_resets_running_session() {
        let mut session = notes_session(10);
        session.answer(name("C"), Some(name("C")), T0);
        session.answer(name("C"), Some(name("C")), T0 + 1);
        assert_eq!(session.counters().total(), 2);

        assert!(session.set_scale(Scale::G));
        assert_eq!(session.phase(), GamePhase::Idle);
        assert_eq!(session.counters().total(), 0);
        assert_eq!(session.started_at(), None);
        // the new scale sticks
        assert_eq!(session.settings().scale(), Scale::G);
    }

    #[test]
    fn setting_same_value_is_a_noop() {
        let mut session = notes_session(10);
        session.answer(name("C"), Some(name("C")), T0);

        assert!(!session.set_scale(Scale::C));
        assert!(!session.set_mode(GameMode::Notes));
        assert!(!session.set_note_limit(10).unwrap());
        assert_eq!(session.phase(), GamePhase::Running);
        assert_eq!(session.counters().total(), 1);
    }

    #[test]
    fn zero_limits_are_rejected_without_reset() {
        let mut session = notes_session(10);
        session.answer(name("C"), Some(name("C")), T0);
        assert!(session.set_note_limit(0).is_err());
        assert!(session.set_time_limit_secs(0).is_err());
        assert_eq!(session.phase(), GamePhase::Running);
    }

    #[test]
    fn reset_is_idempotent() {
        let mut session = notes_session(10);
        session.answer(name("C"), Some(name("C")), T0);
        session.reset();
        let once = session.clone();
        session.reset();
        assert_eq!(session, once);
    }

    fn service_with_auth(auth: Option<AuthSession>) -> GameLoopService {
        use api::{InMemoryEntryStore, InMemoryPromptSource};
        GameLoopService::new(
            Clock::fixed(T0),
            Arc::new(PromptService::new(Arc::new(InMemoryPromptSource::new()))),
            Arc::new(InMemoryEntryStore::new()),
            auth,
        )
    }

    #[test]
    fn empty_sessions_are_never_reported() {
        let auth = AuthSession::new(
            sightread_core::model::UserId::new(1),
            "a@b.c",
            "A B",
        );
        let service = service_with_auth(Some(auth));
        let mut state = service.lock();
        // zero answers: no report, regardless of authentication
        assert!(service.claim_report(&mut state, 10).is_none());
    }

    #[test]
    fn report_is_claimed_exactly_once() {
        let auth = AuthSession::new(
            sightread_core::model::UserId::new(1),
            "a@b.c",
            "A B",
        );
        let service = service_with_auth(Some(auth));
        let mut state = service.lock();
        state.session.answer(name("C"), Some(name("C")), T0);

        let first = service.claim_report(&mut state, 15);
        let second = service.claim_report(&mut state, 15);
        assert!(first.is_some());
        assert!(second.is_none());
    }

    #[test]
    fn unauthenticated_sessions_produce_no_report() {
        let service = service_with_auth(None);
        let mut state = service.lock();
        state.session.answer(name("C"), Some(name("C")), T0);
        assert!(service.claim_report(&mut state, 15).is_none());
    }
}
