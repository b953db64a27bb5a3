use std::time::Duration;

use dioxus::document::eval;
use dioxus::prelude::*;
use keyboard_types::Key;

use services::{GameLoopService, GameSnapshot};
use sightread_core::model::{GameMode, GamePhase, NoteName, Octave, Scale};

use crate::context::AppContext;
use crate::vm::{ANSWER_ROWS, note_for_key, score_line, timer_label};

mod scripts;

const TIME_OPTIONS: [u32; 4] = [15, 30, 60, 120];
const NOTE_OPTIONS: [u32; 4] = [10, 25, 50, 100];

// The displayed clock only moves when the whole second changes; polling
// faster than that keeps it honest under sloppy scheduling without
// re-rendering ten times a second.
const TIMER_POLL: Duration = Duration::from_millis(100);

#[component]
pub fn PracticeView() -> Element {
    let ctx = use_context::<AppContext>();
    // One game per mounted view, with the auth session captured at mount.
    let game = use_hook(|| ctx.services().new_game(ctx.auth().session()));
    let mut snapshot = use_signal(|| game.snapshot());

    // Initial prompt fetch.
    {
        let game = game.clone();
        use_future(move || {
            let game = game.clone();
            async move {
                game.reset_game().await;
                snapshot.set(game.snapshot());
            }
        });
    }

    // Timer poll. The tick drives the time-mode end condition; the signal is
    // only written when the displayed second actually changed.
    {
        let game = game.clone();
        use_future(move || {
            let game = game.clone();
            async move {
                loop {
                    tokio::time::sleep(TIMER_POLL).await;
                    let tick = game.tick().await;
                    let shown = snapshot.peek().elapsed_secs;
                    if tick.just_finished || tick.elapsed_secs != shown {
                        snapshot.set(game.snapshot());
                    }
                }
            }
        });
    }

    // Re-render the score only when a new prompt lands, not on every tick.
    let mut last_score = use_signal(String::new);
    use_effect(move || {
        let snap = snapshot();
        if let Some(active) = snap.prompt
            && *last_score.peek() != active.prompt.score_xml
        {
            last_score.set(active.prompt.score_xml.clone());
            eval(&scripts::render_score_script(&active.prompt.score_xml));
        }
    });

    let submit_answer = {
        let game = game.clone();
        move |note: NoteName| {
            let game = game.clone();
            spawn(async move {
                let outcome = game.handle_answer(note).await;
                if let Some(cue) = outcome.cue {
                    eval(&scripts::play_cue_script(cue));
                }
                snapshot.set(game.snapshot());
            });
        }
    };

    let key_answer = submit_answer.clone();
    let pad_answer = submit_answer;
    let snap = snapshot();
    let finished = snap.phase == GamePhase::Finished;

    rsx! {
        div {
            class: "page practice",
            tabindex: "0",
            onkeydown: move |evt| {
                if let Key::Character(text) = evt.key()
                    && let Some(note) = note_for_key(text.as_str())
                {
                    key_answer(note);
                }
            },

            ScoreHeader { snapshot: snap.clone() }
            {settings_bar(&game, snapshot, &snap)}

            if finished {
                {game_over_panel(&game, snapshot, &snap)}
            } else {
                div { id: "score-pane", class: "score-pane" }
                AnswerPad { on_answer: move |note| pad_answer(note) }
            }
        }
    }
}

#[component]
fn ScoreHeader(snapshot: GameSnapshot) -> Element {
    let clock = timer_label(&snapshot);
    rsx! {
        header { class: "score-header",
            match score_line(&snapshot) {
                Some(line) => rsx! {
                    span { class: "accuracy", "{line.accuracy_label}" }
                    span { class: "fraction", "{line.fraction}" }
                    span { class: "pace", "{line.npm_label}" }
                },
                None => rsx! {
                    span { "Answer to start a session!" }
                },
            }
            span { class: "clock", "{clock}" }
        }
    }
}

#[component]
fn AnswerPad(on_answer: EventHandler<NoteName>) -> Element {
    rsx! {
        div { class: "answer-pad",
            for row in ANSWER_ROWS {
                div { class: "answer-row",
                    for choice in row.iter().copied() {
                        button {
                            class: "answer",
                            onclick: move |_| {
                                if let Ok(note) = choice.token.parse::<NoteName>() {
                                    on_answer.call(note);
                                }
                            },
                            "{choice.label}"
                        }
                    }
                }
            }
        }
    }
}

fn settings_bar(
    game: &GameLoopService,
    snapshot: Signal<GameSnapshot>,
    current: &GameSnapshot,
) -> Element {
    let settings = current.settings;
    let mode = settings.mode();

    let set_mode = {
        let game = game.clone();
        move |mode: GameMode| {
            let game = game.clone();
            let mut snapshot = snapshot;
            spawn(async move {
                game.set_mode(mode).await;
                snapshot.set(game.snapshot());
            });
        }
    };
    let mode_to_time = set_mode.clone();
    let mode_to_notes = set_mode;

    let limit_game = game.clone();
    let scale_game = game.clone();
    let octave_game = game.clone();

    rsx! {
        div { class: "settings-bar",
            div { class: "mode-toggle",
                button {
                    class: if mode == GameMode::Time { "active" } else { "" },
                    onclick: move |_| mode_to_time(GameMode::Time),
                    "Time"
                }
                button {
                    class: if mode == GameMode::Notes { "active" } else { "" },
                    onclick: move |_| mode_to_notes(GameMode::Notes),
                    "Notes"
                }
            }

            select {
                class: "limit-select",
                onchange: move |evt| {
                    let game = limit_game.clone();
                    let mut snapshot = snapshot;
                    if let Ok(limit) = evt.value().parse::<u32>() {
                        spawn(async move {
                            let applied = match game.snapshot().settings.mode() {
                                GameMode::Time => game.set_time_limit_secs(limit).await,
                                GameMode::Notes => game.set_note_limit(limit).await,
                            };
                            if applied.is_ok() {
                                snapshot.set(game.snapshot());
                            }
                        });
                    }
                },
                match mode {
                    GameMode::Time => rsx! {
                        for secs in TIME_OPTIONS {
                            option {
                                value: "{secs}",
                                selected: settings.time_limit_secs() == secs,
                                "{secs} seconds"
                            }
                        }
                    },
                    GameMode::Notes => rsx! {
                        for count in NOTE_OPTIONS {
                            option {
                                value: "{count}",
                                selected: settings.note_limit() == count,
                                "{count} notes"
                            }
                        }
                    },
                }
            }

            select {
                class: "scale-select",
                onchange: move |evt| {
                    let game = scale_game.clone();
                    let mut snapshot = snapshot;
                    if let Ok(scale) = evt.value().parse::<Scale>() {
                        spawn(async move {
                            game.set_scale(scale).await;
                            snapshot.set(game.snapshot());
                        });
                    }
                },
                for scale in Scale::ALL {
                    option {
                        value: "{scale.as_str()}",
                        selected: settings.scale() == scale,
                        "{scale.label()} Major"
                    }
                }
            }

            select {
                class: "octave-select",
                onchange: move |evt| {
                    let game = octave_game.clone();
                    let mut snapshot = snapshot;
                    if let Ok(octave) = evt.value().parse::<Octave>() {
                        spawn(async move {
                            game.set_octave(octave).await;
                            snapshot.set(game.snapshot());
                        });
                    }
                },
                for register in 1..=9u8 {
                    option {
                        value: "{register}",
                        selected: settings.octave().value() == register,
                        "Octave {register}"
                    }
                }
            }
        }
    }
}

fn game_over_panel(
    game: &GameLoopService,
    snapshot: Signal<GameSnapshot>,
    current: &GameSnapshot,
) -> Element {
    let authenticated = game.is_authenticated();
    let play_again = {
        let game = game.clone();
        move |_| {
            let game = game.clone();
            let mut snapshot = snapshot;
            spawn(async move {
                game.reset_game().await;
                snapshot.set(game.snapshot());
            });
        }
    };
    let accuracy = current.accuracy;
    let correct = current.correct;
    let total = current.total;
    let pace = current.notes_per_minute;
    let saved = current.saved_entry.is_some();

    rsx! {
        div { class: "game-over",
            h2 { "Session over" }
            p { class: "final-score",
                "Accuracy {accuracy}% · {correct}/{total} · NPM {pace}"
            }
            if saved {
                p { class: "saved", "Saved to your history." }
            } else if !authenticated && total > 0 {
                p { class: "saved", "Sign in to keep your results." }
            }
            button { class: "cta", onclick: play_again, "Play again" }
        }
    }
}
