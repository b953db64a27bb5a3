use services::GameSnapshot;
use sightread_core::model::{GameMode, NoteName};

use crate::vm::time_fmt::format_clock;

//
// ─── ANSWER INPUT ──────────────────────────────────────────────────────────────
//

/// One answer button: what it shows and the token it submits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnswerOption {
    pub label: &'static str,
    pub token: &'static str,
}

const fn option(label: &'static str, token: &'static str) -> AnswerOption {
    AnswerOption { label, token }
}

/// The answer pad: a row of sharps, a row of naturals, a row of flats.
/// Every spelling is offered, including the enharmonic naturals (E#, Cb);
/// validation canonicalizes before comparing.
pub const ANSWER_ROWS: [&[AnswerOption]; 3] = [
    &[
        option("C#", "C#"),
        option("D#", "D#"),
        option("E#", "E#"),
        option("F#", "F#"),
        option("G#", "G#"),
        option("A#", "A#"),
        option("B#", "B#"),
    ],
    &[
        option("C", "C"),
        option("D", "D"),
        option("E", "E"),
        option("F", "F"),
        option("G", "G"),
        option("A", "A"),
        option("B", "B"),
    ],
    &[
        option("Cb", "C-"),
        option("Db", "D-"),
        option("Eb", "E-"),
        option("Fb", "F-"),
        option("Gb", "G-"),
        option("Ab", "A-"),
        option("Bb", "B-"),
    ],
];

/// Map a pressed character to an answer, piano-roll style: home row for
/// naturals, the row above for the black keys.
#[must_use]
pub fn note_for_key(key: &str) -> Option<NoteName> {
    let token = match key {
        "a" => "C",
        "w" => "D-",
        "s" => "D",
        "e" => "E-",
        "d" => "E",
        "f" => "F",
        "t" => "G-",
        "g" => "G",
        "y" => "A-",
        "h" => "A",
        "u" => "B-",
        "j" => "B",
        "k" => "C",
        _ => return None,
    };
    token.parse().ok()
}

//
// ─── SCORE HEADER ──────────────────────────────────────────────────────────────
//

/// Live score line; None until the first answer lands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreLineVm {
    pub accuracy_label: String,
    pub fraction: String,
    pub npm_label: String,
}

#[must_use]
pub fn score_line(snapshot: &GameSnapshot) -> Option<ScoreLineVm> {
    if snapshot.total == 0 {
        return None;
    }
    Some(ScoreLineVm {
        accuracy_label: format!("{}%", snapshot.accuracy),
        fraction: format!("{}/{}", snapshot.correct, snapshot.total),
        npm_label: format!("NPM: {}", snapshot.notes_per_minute),
    })
}

/// Progress label next to the score: countdown in time mode, answer count
/// against the limit in count mode.
#[must_use]
pub fn timer_label(snapshot: &GameSnapshot) -> String {
    match snapshot.settings.mode() {
        GameMode::Time => format_clock(snapshot.remaining_secs),
        GameMode::Notes => format!("{}/{}", snapshot.total, snapshot.settings.note_limit()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use services::GameSnapshot;
    use sightread_core::model::{GamePhase, GameSettings};

    fn snapshot() -> GameSnapshot {
        GameSnapshot {
            phase: GamePhase::Idle,
            settings: GameSettings::default(),
            total: 0,
            correct: 0,
            accuracy: 0,
            notes_per_minute: 0,
            elapsed_secs: 0,
            remaining_secs: 30,
            prompt: None,
            saved_entry: None,
        }
    }

    #[test]
    fn every_key_maps_to_a_parseable_note() {
        for key in ["a", "w", "s", "e", "d", "f", "t", "g", "y", "h", "u", "j", "k"] {
            assert!(note_for_key(key).is_some(), "{key}");
        }
        assert!(note_for_key("z").is_none());
        assert!(note_for_key("Enter").is_none());
    }

    #[test]
    fn outer_keys_wrap_to_c() {
        assert_eq!(note_for_key("a"), note_for_key("k"));
    }

    #[test]
    fn black_key_rows_match_their_flats() {
        // w sits between a and s, so it is the flat of D
        assert_eq!(note_for_key("w"), Some("C#".parse().unwrap()));
    }

    #[test]
    fn score_line_hidden_before_first_answer() {
        assert_eq!(score_line(&snapshot()), None);
    }

    #[test]
    fn score_line_shows_accuracy_fraction_and_pace() {
        let mut snap = snapshot();
        snap.total = 3;
        snap.correct = 2;
        snap.accuracy = 67;
        snap.notes_per_minute = 12;

        let line = score_line(&snap).unwrap();
        assert_eq!(line.accuracy_label, "67%");
        assert_eq!(line.fraction, "2/3");
        assert_eq!(line.npm_label, "NPM: 12");
    }

    #[test]
    fn timer_label_follows_mode() {
        let mut snap = snapshot();
        snap.remaining_secs = 75;
        assert_eq!(timer_label(&snap), "1:15");

        snap.settings.set_mode(GameMode::Notes);
        snap.total = 4;
        assert_eq!(timer_label(&snap), "4/25");
    }

    #[test]
    fn every_answer_token_parses() {
        for row in ANSWER_ROWS {
            for option in row {
                assert!(option.token.parse::<NoteName>().is_ok(), "{}", option.token);
            }
        }
    }
}
