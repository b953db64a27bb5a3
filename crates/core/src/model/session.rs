use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::{EntryId, UserId};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionReportError {
    #[error("a report needs at least one answered question")]
    Empty,

    #[error("correct answers ({correct}) exceed total answers ({total})")]
    CountMismatch { total: u32, correct: u32 },
}

//
// ─── REPORT ────────────────────────────────────────────────────────────────────
//

/// Render whole seconds as zero-padded `HH:MM:SS`, the wire form the main
/// backend stores session lengths in.
#[must_use]
pub fn format_hms(secs: i64) -> String {
    let secs = secs.max(0);
    let hours = secs / 3600;
    let minutes = (secs % 3600) / 60;
    let seconds = secs % 60;
    format!("{hours:02}:{minutes:02}:{seconds:02}")
}

/// Terminal form of a finished session, ready for the entry store.
///
/// A report only exists for sessions with at least one answer; empty sessions
/// are never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionReport {
    user_id: UserId,
    time_length: String,
    total_questions: u32,
    correct_questions: u32,
    notes_per_minute: u32,
}

impl SessionReport {
    /// Build a report from final session values.
    ///
    /// # Errors
    ///
    /// Returns `SessionReportError::Empty` when no questions were answered,
    /// or `CountMismatch` if correct exceeds total.
    pub fn new(
        user_id: UserId,
        elapsed_secs: i64,
        total_questions: u32,
        correct_questions: u32,
        notes_per_minute: u32,
    ) -> Result<Self, SessionReportError> {
        if total_questions == 0 {
            return Err(SessionReportError::Empty);
        }
        if correct_questions > total_questions {
            return Err(SessionReportError::CountMismatch {
                total: total_questions,
                correct: correct_questions,
            });
        }
        Ok(Self {
            user_id,
            time_length: format_hms(elapsed_secs),
            total_questions,
            correct_questions,
            notes_per_minute,
        })
    }

    #[must_use]
    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Session length as `HH:MM:SS`.
    #[must_use]
    pub fn time_length(&self) -> &str {
        &self.time_length
    }

    #[must_use]
    pub fn total_questions(&self) -> u32 {
        self.total_questions
    }

    #[must_use]
    pub fn correct_questions(&self) -> u32 {
        self.correct_questions
    }

    #[must_use]
    pub fn notes_per_minute(&self) -> u32 {
        self.notes_per_minute
    }
}

//
// ─── PERSISTED ENTRY ───────────────────────────────────────────────────────────
//

/// A practice entry as the main backend returns it from the history endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PracticeEntry {
    pub id: EntryId,
    pub user_id: UserId,
    pub time_length: String,
    pub total_questions: u32,
    pub correct_questions: u32,
    pub notes_per_minute: u32,
    pub created_date: DateTime<Utc>,
}

impl PracticeEntry {
    /// Percentage of correct answers, rounded; 0 for an empty entry.
    #[must_use]
    pub fn accuracy(&self) -> u32 {
        if self.total_questions == 0 {
            return 0;
        }
        let ratio = f64::from(self.correct_questions) / f64::from(self.total_questions);
        (ratio * 100.0).round() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_hms_with_padding() {
        assert_eq!(format_hms(0), "00:00:00");
        assert_eq!(format_hms(15), "00:00:15");
        assert_eq!(format_hms(75), "00:01:15");
        assert_eq!(format_hms(3_661), "01:01:01");
        assert_eq!(format_hms(-5), "00:00:00");
    }

    #[test]
    fn report_rejects_empty_sessions() {
        let err = SessionReport::new(UserId::new(1), 30, 0, 0, 0).unwrap_err();
        assert_eq!(err, SessionReportError::Empty);
    }

    #[test]
    fn report_rejects_impossible_counts() {
        let err = SessionReport::new(UserId::new(1), 30, 3, 5, 10).unwrap_err();
        assert!(matches!(err, SessionReportError::CountMismatch { .. }));
    }

    #[test]
    fn report_carries_formatted_length() {
        let report = SessionReport::new(UserId::new(7), 15, 3, 2, 12).unwrap();
        assert_eq!(report.time_length(), "00:00:15");
        assert_eq!(report.total_questions(), 3);
        assert_eq!(report.correct_questions(), 2);
        assert_eq!(report.notes_per_minute(), 12);
    }

    #[test]
    fn entry_accuracy_never_divides_by_zero() {
        let entry = PracticeEntry {
            id: EntryId::new(1),
            user_id: UserId::new(1),
            time_length: "00:00:30".into(),
            total_questions: 0,
            correct_questions: 0,
            notes_per_minute: 0,
            created_date: Utc::now(),
        };
        assert_eq!(entry.accuracy(), 0);
    }
}
