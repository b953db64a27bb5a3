use std::sync::Arc;

use api::{InMemoryEntryStore, InMemoryPromptSource, NotePrompt};
use services::{Clock, GameLoopService, PromptService};
use sightread_core::model::{
    AuthSession, GameMode, GamePhase, Note, NoteName, Octave, UserId,
};
use sightread_core::time::FIXED_TEST_TIMESTAMP;

fn prompt(name: &str) -> NotePrompt {
    NotePrompt {
        score_xml: format!("<score-partwise>{name}</score-partwise>"),
        note: Note::new(name.parse::<NoteName>().unwrap(), Octave::new(4).unwrap()),
    }
}

fn note(name: &str) -> NoteName {
    name.parse().unwrap()
}

struct Harness {
    game: GameLoopService,
    source: InMemoryPromptSource,
    store: InMemoryEntryStore,
}

fn harness(auth: Option<AuthSession>) -> Harness {
    let source = InMemoryPromptSource::new();
    let store = InMemoryEntryStore::new();
    let prompts = Arc::new(PromptService::new(Arc::new(source.clone())));
    let game = GameLoopService::new(
        Clock::fixed(FIXED_TEST_TIMESTAMP),
        prompts,
        Arc::new(store.clone()),
        auth,
    );
    Harness {
        game,
        source,
        store,
    }
}

fn player() -> AuthSession {
    AuthSession::new(UserId::new(7), "amy@example.com", "Amy Adams")
}

#[tokio::test]
async fn count_mode_session_persists_once_on_completion() {
    let h = harness(Some(player()));
    h.source.push(prompt("C"));
    h.game.set_mode(GameMode::Notes).await;
    h.game.set_note_limit(3).await.unwrap();
    h.game.reset_game().await;

    let first = h.game.handle_answer(note("C")).await;
    assert!(first.is_correct);
    assert_eq!(first.cue, Some("/audio/marimba-c4.mp3"));
    assert!(!first.just_finished);

    let second = h.game.handle_answer(note("D")).await;
    assert!(!second.is_correct);
    assert!(second.cue.is_none());

    let third = h.game.handle_answer(note("C")).await;
    assert!(third.just_finished);

    let snapshot = h.game.snapshot();
    assert_eq!(snapshot.phase, GamePhase::Finished);
    assert_eq!(snapshot.total, 3);
    assert_eq!(snapshot.correct, 2);
    assert_eq!(snapshot.accuracy, 67);
    assert!(snapshot.saved_entry.is_some());

    let saved = h.store.saved();
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0].user_id, UserId::new(7));
    assert_eq!(saved[0].total_questions, 3);
    assert_eq!(saved[0].correct_questions, 2);

    // answers after the end are ignored and never re-persist
    let ignored = h.game.handle_answer(note("C")).await;
    assert!(!ignored.counted);
    assert_eq!(h.store.saved_count(), 1);
}

#[tokio::test]
async fn unauthenticated_session_is_never_persisted() {
    let h = harness(None);
    h.source.push(prompt("C"));
    h.game.set_mode(GameMode::Notes).await;
    h.game.set_note_limit(1).await.unwrap();
    h.game.reset_game().await;

    let outcome = h.game.handle_answer(note("C")).await;
    assert!(outcome.just_finished);
    assert_eq!(h.game.snapshot().phase, GamePhase::Finished);
    assert_eq!(h.store.saved_count(), 0);
}

#[tokio::test]
async fn settings_change_discards_running_session_without_persisting() {
    let h = harness(Some(player()));
    h.source.push(prompt("C"));
    h.game.set_mode(GameMode::Notes).await;
    h.game.set_note_limit(10).await.unwrap();
    h.game.reset_game().await;

    h.game.handle_answer(note("C")).await;
    h.game.handle_answer(note("C")).await;
    assert_eq!(h.game.snapshot().total, 2);

    h.game
        .set_scale(sightread_core::model::Scale::G)
        .await;

    let snapshot = h.game.snapshot();
    assert_eq!(snapshot.phase, GamePhase::Idle);
    assert_eq!(snapshot.total, 0);
    assert_eq!(h.store.saved_count(), 0);
}

#[tokio::test]
async fn failed_save_leaves_session_finished_and_is_not_retried() {
    let h = harness(Some(player()));
    h.source.push(prompt("C"));
    h.store.fail_next_save();
    h.game.set_mode(GameMode::Notes).await;
    h.game.set_note_limit(1).await.unwrap();
    h.game.reset_game().await;

    let outcome = h.game.handle_answer(note("C")).await;
    assert!(outcome.just_finished);

    let snapshot = h.game.snapshot();
    assert_eq!(snapshot.phase, GamePhase::Finished);
    assert!(snapshot.saved_entry.is_none());
    assert_eq!(h.store.saved_count(), 0);
}

#[tokio::test]
async fn answers_advance_the_prompt_feed() {
    let h = harness(Some(player()));
    h.game.set_mode(GameMode::Notes).await;
    h.game.set_note_limit(10).await.unwrap();
    // queue up after the settings churn so the order on screen is C then E
    h.source.push(prompt("C"));
    h.source.push(prompt("E"));
    h.game.reset_game().await;

    let before = h.game.snapshot();
    assert_eq!(
        before.prompt.as_ref().unwrap().prompt.note.name.to_string(),
        "C"
    );

    h.game.handle_answer(note("C")).await;

    let after = h.game.snapshot();
    assert_eq!(
        after.prompt.as_ref().unwrap().prompt.note.name.to_string(),
        "E"
    );
}

#[tokio::test]
async fn finished_session_stops_fetching_prompts() {
    let h = harness(Some(player()));
    h.source.push(prompt("C"));
    h.game.set_mode(GameMode::Notes).await;
    h.game.set_note_limit(1).await.unwrap();
    h.game.reset_game().await;
    let fetches_before = h.source.fetch_count();

    h.game.handle_answer(note("C")).await;
    // the finishing answer suspends the feed instead of fetching again
    assert_eq!(h.source.fetch_count(), fetches_before);

    // play again resumes it
    h.game.reset_game().await;
    assert_eq!(h.source.fetch_count(), fetches_before + 1);
}
