use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub struct ScaleParseError {
    raw: String,
}

impl fmt::Display for ScaleParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown scale: {}", self.raw)
    }
}

/// Tonic of the major key the backend generates prompts in.
///
/// Closed list, matching the options the settings panel offers. The backend
/// takes the spelled-out form (`BFlat`, `GFlat`) as its `tonic` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Scale {
    C,
    G,
    D,
    A,
    E,
    B,
    GFlat,
    DFlat,
    AFlat,
    EFlat,
    BFlat,
    F,
}

impl Scale {
    /// All scales in circle-of-fifths order, as the settings panel lists them.
    pub const ALL: [Scale; 12] = [
        Scale::C,
        Scale::G,
        Scale::D,
        Scale::A,
        Scale::E,
        Scale::B,
        Scale::GFlat,
        Scale::DFlat,
        Scale::AFlat,
        Scale::EFlat,
        Scale::BFlat,
        Scale::F,
    ];

    /// The backend wire spelling of this tonic.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Scale::C => "C",
            Scale::G => "G",
            Scale::D => "D",
            Scale::A => "A",
            Scale::E => "E",
            Scale::B => "B",
            Scale::GFlat => "GFlat",
            Scale::DFlat => "DFlat",
            Scale::AFlat => "AFlat",
            Scale::EFlat => "EFlat",
            Scale::BFlat => "BFlat",
            Scale::F => "F",
        }
    }

    /// Short display label for pickers ("Gb", not "GFlat").
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Scale::C => "C",
            Scale::G => "G",
            Scale::D => "D",
            Scale::A => "A",
            Scale::E => "E",
            Scale::B => "B",
            Scale::GFlat => "Gb",
            Scale::DFlat => "Db",
            Scale::AFlat => "Ab",
            Scale::EFlat => "Eb",
            Scale::BFlat => "Bb",
            Scale::F => "F",
        }
    }
}

impl fmt::Display for Scale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Scale {
    type Err = ScaleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Scale::ALL
            .iter()
            .find(|scale| {
                scale.as_str().eq_ignore_ascii_case(trimmed)
                    || scale.label().eq_ignore_ascii_case(trimmed)
            })
            .copied()
            .ok_or_else(|| ScaleParseError {
                raw: trimmed.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_listed_scale() {
        for scale in Scale::ALL {
            assert_eq!(scale.as_str().parse::<Scale>().unwrap(), scale);
        }
    }

    #[test]
    fn parses_short_labels_too() {
        assert_eq!("Bb".parse::<Scale>().unwrap(), Scale::BFlat);
        assert_eq!("gflat".parse::<Scale>().unwrap(), Scale::GFlat);
    }

    #[test]
    fn rejects_unknown_tonics() {
        assert!("H#".parse::<Scale>().is_err());
        assert!("F#".parse::<Scale>().is_err());
    }
}
