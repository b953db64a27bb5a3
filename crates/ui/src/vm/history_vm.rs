use sightread_core::model::PracticeEntry;

use crate::vm::time_fmt::format_date;

/// One row of the recent-sessions table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryRowVm {
    pub id: u64,
    pub date_label: String,
    pub time_length: String,
    pub fraction: String,
    pub accuracy_label: String,
    pub npm: u32,
}

#[must_use]
pub fn map_history_rows(entries: &[PracticeEntry]) -> Vec<HistoryRowVm> {
    entries
        .iter()
        .map(|entry| HistoryRowVm {
            id: entry.id.value(),
            date_label: format_date(entry.created_date),
            time_length: entry.time_length.clone(),
            fraction: format!("{}/{}", entry.correct_questions, entry.total_questions),
            accuracy_label: format!("{}%", entry.accuracy()),
            npm: entry.notes_per_minute,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use chrono::Utc;
    use sightread_core::model::{EntryId, UserId};

    #[test]
    fn maps_entry_fields_for_display() {
        let entry = PracticeEntry {
            id: EntryId::new(3),
            user_id: UserId::new(1),
            time_length: "00:00:30".into(),
            total_questions: 10,
            correct_questions: 7,
            notes_per_minute: 20,
            created_date: Utc.with_ymd_and_hms(2024, 3, 7, 9, 30, 0).unwrap(),
        };

        let rows = map_history_rows(std::slice::from_ref(&entry));
        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_eq!(row.id, 3);
        assert_eq!(row.date_label, "Mar 7, 2024");
        assert_eq!(row.fraction, "7/10");
        assert_eq!(row.accuracy_label, "70%");
        assert_eq!(row.npm, 20);
    }
}
