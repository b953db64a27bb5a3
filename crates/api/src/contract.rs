//! Contracts for the remote collaborators, plus in-memory fakes for tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;

use sightread_core::model::{EntryId, Note, Octave, PracticeEntry, Scale, SessionReport, UserId};

use crate::error::ApiError;

//
// ─── PROMPTS ───────────────────────────────────────────────────────────────────
//

/// One generated prompt: the renderable score plus the note it shows.
///
/// The score document is opaque MusicXML; only the notation renderer reads
/// it. Answer validation uses `note` alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotePrompt {
    pub score_xml: String,
    pub note: Note,
}

/// Source of note prompts (the music-generation backend).
#[async_trait]
pub trait PromptSource: Send + Sync {
    /// Generate one prompt in the given key and register.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` when the backend is unreachable or replies with a
    /// payload the game cannot use.
    async fn fetch_prompt(&self, scale: Scale, octave: Octave) -> Result<NotePrompt, ApiError>;
}

/// Store for finished sessions (the main backend).
#[async_trait]
pub trait EntryStore: Send + Sync {
    /// Persist one finished session, returning the backend-assigned id.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport or backend failures.
    async fn save_entry(&self, report: &SessionReport) -> Result<EntryId, ApiError>;

    /// Most recent entries for a user, newest first.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport or backend failures.
    async fn recent_entries(&self, user_id: UserId) -> Result<Vec<PracticeEntry>, ApiError>;
}

//
// ─── IN-MEMORY FAKES ───────────────────────────────────────────────────────────
//

/// Scripted prompt source for tests: pops queued prompts, repeating the last
/// one once the queue runs dry.
#[derive(Clone, Default)]
pub struct InMemoryPromptSource {
    prompts: Arc<Mutex<VecDeque<NotePrompt>>>,
    last: Arc<Mutex<Option<NotePrompt>>>,
    fetches: Arc<AtomicU64>,
}

impl InMemoryPromptSource {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a prompt to be served by the next fetch.
    pub fn push(&self, prompt: NotePrompt) {
        if let Ok(mut guard) = self.prompts.lock() {
            guard.push_back(prompt);
        }
    }

    /// Number of fetches issued so far.
    #[must_use]
    pub fn fetch_count(&self) -> u64 {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PromptSource for InMemoryPromptSource {
    async fn fetch_prompt(&self, _scale: Scale, _octave: Octave) -> Result<NotePrompt, ApiError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        let popped = self
            .prompts
            .lock()
            .map_err(|e| ApiError::Malformed(e.to_string()))?
            .pop_front();
        let mut last = self
            .last
            .lock()
            .map_err(|e| ApiError::Malformed(e.to_string()))?;
        match popped {
            Some(prompt) => {
                *last = Some(prompt.clone());
                Ok(prompt)
            }
            None => last.clone().ok_or(ApiError::Backend {
                message: "no prompt scripted".to_string(),
            }),
        }
    }
}

/// Entry store kept in a vec, with a fail switch for error-path tests.
#[derive(Clone, Default)]
pub struct InMemoryEntryStore {
    entries: Arc<Mutex<Vec<PracticeEntry>>>,
    next_id: Arc<AtomicU64>,
    fail_next: Arc<AtomicBool>,
}

impl InMemoryEntryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `save_entry` call fail.
    pub fn fail_next_save(&self) {
        self.fail_next.store(true, Ordering::SeqCst);
    }

    /// Everything saved so far, oldest first.
    #[must_use]
    pub fn saved(&self) -> Vec<PracticeEntry> {
        self.entries.lock().map(|e| e.clone()).unwrap_or_default()
    }

    #[must_use]
    pub fn saved_count(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }
}

#[async_trait]
impl EntryStore for InMemoryEntryStore {
    async fn save_entry(&self, report: &SessionReport) -> Result<EntryId, ApiError> {
        if self.fail_next.swap(false, Ordering::SeqCst) {
            return Err(ApiError::Backend {
                message: "scripted failure".to_string(),
            });
        }
        let id = EntryId::new(self.next_id.fetch_add(1, Ordering::SeqCst) + 1);
        let entry = PracticeEntry {
            id,
            user_id: report.user_id(),
            time_length: report.time_length().to_string(),
            total_questions: report.total_questions(),
            correct_questions: report.correct_questions(),
            notes_per_minute: report.notes_per_minute(),
            created_date: Utc::now(),
        };
        self.entries
            .lock()
            .map_err(|e| ApiError::Malformed(e.to_string()))?
            .push(entry);
        Ok(id)
    }

    async fn recent_entries(&self, user_id: UserId) -> Result<Vec<PracticeEntry>, ApiError> {
        let guard = self
            .entries
            .lock()
            .map_err(|e| ApiError::Malformed(e.to_string()))?;
        let mut entries: Vec<PracticeEntry> = guard
            .iter()
            .filter(|entry| entry.user_id == user_id)
            .cloned()
            .collect();
        entries.reverse();
        entries.truncate(10);
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sightread_core::model::NoteName;

    fn prompt(name: &str) -> NotePrompt {
        NotePrompt {
            score_xml: format!("<score>{name}</score>"),
            note: Note::new(name.parse::<NoteName>().unwrap(), Octave::new(4).unwrap()),
        }
    }

    #[tokio::test]
    async fn prompt_source_pops_then_repeats_last() {
        let source = InMemoryPromptSource::new();
        source.push(prompt("C"));
        source.push(prompt("D"));

        let octave = Octave::new(4).unwrap();
        let first = source.fetch_prompt(Scale::C, octave).await.unwrap();
        let second = source.fetch_prompt(Scale::C, octave).await.unwrap();
        let third = source.fetch_prompt(Scale::C, octave).await.unwrap();

        assert_eq!(first.note.name.to_string(), "C");
        assert_eq!(second.note.name.to_string(), "D");
        assert_eq!(third, second);
        assert_eq!(source.fetch_count(), 3);
    }

    #[tokio::test]
    async fn entry_store_assigns_ids_and_filters_by_user() {
        let store = InMemoryEntryStore::new();
        let report = SessionReport::new(UserId::new(1), 15, 3, 2, 12).unwrap();
        let other = SessionReport::new(UserId::new(2), 20, 4, 4, 12).unwrap();

        let id = store.save_entry(&report).await.unwrap();
        store.save_entry(&other).await.unwrap();

        assert_eq!(id, EntryId::new(1));
        let recent = store.recent_entries(UserId::new(1)).await.unwrap();
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].total_questions, 3);
    }

    #[tokio::test]
    async fn entry_store_fail_switch_is_one_shot() {
        let store = InMemoryEntryStore::new();
        store.fail_next_save();
        let report = SessionReport::new(UserId::new(1), 15, 3, 2, 12).unwrap();

        assert!(store.save_entry(&report).await.is_err());
        assert!(store.save_entry(&report).await.is_ok());
        assert_eq!(store.saved_count(), 1);
    }
}
