//! Audio cues for correct answers.
//!
//! One marimba sample per pitch class, recorded in octave 4. Lookups go
//! through the canonical note form, so enharmonic spellings share a sample
//! (`A-` plays the G# recording). Prompts outside octave 4 have no cue and
//! stay silent.

use sightread_core::model::Note;

const CUE_OCTAVE: u8 = 4;

/// Sample asset for the given prompt note, if one exists.
#[must_use]
pub fn cue_for(note: Note) -> Option<&'static str> {
    if note.octave.value() != CUE_OCTAVE {
        return None;
    }
    let asset = match note.name.pitch_class() {
        0 => "/audio/marimba-c4.mp3",
        1 => "/audio/marimba-csharp4.mp3",
        2 => "/audio/marimba-d4.mp3",
        3 => "/audio/marimba-dsharp4.mp3",
        4 => "/audio/marimba-e4.mp3",
        5 => "/audio/marimba-f4.mp3",
        6 => "/audio/marimba-fsharp4.mp3",
        7 => "/audio/marimba-g4.mp3",
        8 => "/audio/marimba-gsharp4.mp3",
        9 => "/audio/marimba-a4.mp3",
        10 => "/audio/marimba-asharp4.mp3",
        11 => "/audio/marimba-b4.mp3",
        _ => return None,
    };
    Some(asset)
}
