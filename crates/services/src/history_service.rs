use std::sync::Arc;

use api::EntryStore;
use sightread_core::model::{PracticeEntry, UserId};

use crate::error::HistoryError;

/// Read side of the entry store, for the history view.
#[derive(Clone)]
pub struct HistoryService {
    entries: Arc<dyn EntryStore>,
}

impl HistoryService {
    #[must_use]
    pub fn new(entries: Arc<dyn EntryStore>) -> Self {
        Self { entries }
    }

    /// Most recent finished sessions for a user, newest first.
    ///
    /// # Errors
    ///
    /// Returns `HistoryError::Api` on transport or backend failures.
    pub async fn recent_entries(&self, user_id: UserId) -> Result<Vec<PracticeEntry>, HistoryError> {
        Ok(self.entries.recent_entries(user_id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use api::InMemoryEntryStore;
    use sightread_core::model::SessionReport;

    #[tokio::test]
    async fn returns_newest_first_for_one_user() {
        let store = InMemoryEntryStore::new();
        for total in [3, 5] {
            let report = SessionReport::new(UserId::new(1), 30, total, total, total).unwrap();
            store.save_entry(&report).await.unwrap();
        }
        let other = SessionReport::new(UserId::new(2), 30, 9, 9, 9).unwrap();
        store.save_entry(&other).await.unwrap();

        let history = HistoryService::new(Arc::new(store));
        let entries = history.recent_entries(UserId::new(1)).await.unwrap();

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].total_questions, 5);
        assert_eq!(entries[1].total_questions, 3);
    }
}
