use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use thiserror::Error;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum NoteParseError {
    #[error("empty note name")]
    Empty,

    #[error("invalid note letter: {0}")]
    InvalidLetter(char),

    #[error("invalid accidental: {0}")]
    InvalidAccidental(String),

    #[error("octave out of range: {0}")]
    OctaveOutOfRange(String),
}

//
// ─── NOTE NAME ─────────────────────────────────────────────────────────────────
//

/// Semitone offsets for note letters (C=0, D=2, E=4, F=5, G=7, A=9, B=11).
const LETTER_SEMITONES: [(char, i8); 7] = [
    ('C', 0),
    ('D', 2),
    ('E', 4),
    ('F', 5),
    ('G', 7),
    ('A', 9),
    ('B', 11),
];

/// Canonical sharp-preferred spelling for each pitch class.
const CANONICAL_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Accidental {
    Natural,
    Sharp,
    Flat,
}

/// A note letter plus accidental, e.g. `C`, `F#`, `B-`.
///
/// The music backend spells flats with a trailing dash (`D-` for D-flat), so
/// parsing accepts both `Db` and `D-`. Equality is by pitch class: enharmonic
/// spellings such as `C#` and `D-` compare equal, and octave is not part of
/// this type at all. The original spelling is preserved for display.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct NoteName {
    letter: char,
    accidental: Accidental,
}

impl NoteName {
    /// Creates a note name from a letter (A–G) and an accidental.
    ///
    /// # Errors
    ///
    /// Returns `NoteParseError::InvalidLetter` for letters outside A–G.
    pub fn new(letter: char, accidental: Accidental) -> Result<Self, NoteParseError> {
        let letter = letter.to_ascii_uppercase();
        if !LETTER_SEMITONES.iter().any(|(l, _)| *l == letter) {
            return Err(NoteParseError::InvalidLetter(letter));
        }
        Ok(Self { letter, accidental })
    }

    #[must_use]
    pub fn letter(&self) -> char {
        self.letter
    }

    #[must_use]
    pub fn accidental(&self) -> Accidental {
        self.accidental
    }

    /// Pitch class of this spelling, 0–11 with C = 0.
    #[must_use]
    pub fn pitch_class(&self) -> u8 {
        let base = LETTER_SEMITONES
            .iter()
            .find(|(l, _)| *l == self.letter)
            .map_or(0, |(_, s)| i16::from(*s));
        let adjust = match self.accidental {
            Accidental::Natural => 0,
            Accidental::Sharp => 1,
            Accidental::Flat => -1,
        };
        ((base + adjust).rem_euclid(12)) as u8
    }

    /// The sharp-preferred canonical spelling of this pitch class.
    ///
    /// `D-` canonicalizes to `C#`, `F-` to `E`, and so on.
    #[must_use]
    pub fn canonical(&self) -> NoteName {
        CANONICAL_NAMES[self.pitch_class() as usize]
            .parse()
            .unwrap_or(*self)
    }
}

// Enharmonic spellings are the same answer, so equality and hashing go
// through the pitch class rather than the stored spelling.
impl PartialEq for NoteName {
    fn eq(&self, other: &Self) -> bool {
        self.pitch_class() == other.pitch_class()
    }
}

impl Eq for NoteName {}

impl Hash for NoteName {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.pitch_class().hash(state);
    }
}

impl fmt::Display for NoteName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.accidental {
            Accidental::Natural => write!(f, "{}", self.letter),
            Accidental::Sharp => write!(f, "{}#", self.letter),
            Accidental::Flat => write!(f, "{}-", self.letter),
        }
    }
}

impl FromStr for NoteName {
    type Err = NoteParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let mut chars = s.chars();
        let letter = chars.next().ok_or(NoteParseError::Empty)?;
        let rest: String = chars.collect();
        let accidental = match rest.as_str() {
            "" => Accidental::Natural,
            "#" => Accidental::Sharp,
            "-" | "b" => Accidental::Flat,
            other => return Err(NoteParseError::InvalidAccidental(other.to_string())),
        };
        Self::new(letter, accidental)
    }
}

//
// ─── OCTAVE ────────────────────────────────────────────────────────────────────
//

/// Musical register 0–9, the range the music backend generates in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Octave(u8);

impl Octave {
    pub const MIN: u8 = 0;
    pub const MAX: u8 = 9;

    /// Creates an octave, rejecting registers the backend never produces.
    ///
    /// # Errors
    ///
    /// Returns `NoteParseError::OctaveOutOfRange` above octave 9.
    pub fn new(value: u8) -> Result<Self, NoteParseError> {
        if value > Self::MAX {
            return Err(NoteParseError::OctaveOutOfRange(value.to_string()));
        }
        Ok(Self(value))
    }

    #[must_use]
    pub fn value(&self) -> u8 {
        self.0
    }
}

impl fmt::Display for Octave {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Octave {
    type Err = NoteParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: u8 = s
            .trim()
            .parse()
            .map_err(|_| NoteParseError::OctaveOutOfRange(s.to_string()))?;
        Self::new(value)
    }
}

//
// ─── NOTE ──────────────────────────────────────────────────────────────────────
//

/// A concrete pitch: name plus octave, e.g. `C#4`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Note {
    pub name: NoteName,
    pub octave: Octave,
}

impl Note {
    #[must_use]
    pub fn new(name: NoteName, octave: Octave) -> Self {
        Self { name, octave }
    }

    /// Absolute semitone index (octave × 12 + pitch class), for cue lookup.
    #[must_use]
    pub fn semitone_index(&self) -> u8 {
        self.octave.value() * 12 + self.name.pitch_class()
    }
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.name, self.octave)
    }
}

impl FromStr for Note {
    type Err = NoteParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let split = s
            .char_indices()
            .find(|(_, c)| c.is_ascii_digit())
            .map(|(i, _)| i)
            .ok_or_else(|| NoteParseError::OctaveOutOfRange(s.to_string()))?;
        let name: NoteName = s[..split].parse()?;
        let octave: Octave = s[split..].parse()?;
        Ok(Self { name, octave })
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
