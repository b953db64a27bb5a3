use std::sync::{Arc, Mutex, PoisonError};

use api::{ApiError, NotePrompt, PromptSource};
use sightread_core::model::{Octave, Scale};

use crate::cue::cue_for;

/// The prompt the player is currently answering, with its audio cue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivePrompt {
    pub prompt: NotePrompt,
    pub cue: Option<&'static str>,
}

#[derive(Debug, Default)]
struct PromptState {
    current: Option<ActivePrompt>,
    newest_issued: u64,
    suspended: bool,
}

/// Ticket identifying one in-flight fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct FetchTicket {
    seq: u64,
}

/// Fetches prompts from the music backend and keeps the newest one.
///
/// Fetches are not cancelled when superseded; instead every fetch carries a
/// monotonic sequence number and only the newest-issued one may install its
/// result. A slow response for attempt N arriving after attempt N+1's fetch
/// was issued is dropped on the floor, so the displayed prompt always matches
/// the latest request. Fetch failures keep the previous prompt in place.
pub struct PromptService {
    source: Arc<dyn PromptSource>,
    state: Mutex<PromptState>,
}

impl PromptService {
    #[must_use]
    pub fn new(source: Arc<dyn PromptSource>) -> Self {
        Self {
            source,
            state: Mutex::new(PromptState::default()),
        }
    }

    /// The prompt currently on screen, if any fetch has landed yet.
    #[must_use]
    pub fn current(&self) -> Option<ActivePrompt> {
        self.lock().current.clone()
    }

    /// Stop issuing fetches (the session is over; the final score screen
    /// does not need a fresh prompt).
    pub fn suspend(&self) {
        self.lock().suspended = true;
    }

    /// Allow fetches again after a reset.
    pub fn resume(&self) {
        self.lock().suspended = false;
    }

    /// Fetch a prompt for the given key and register and, if this fetch is
    /// still the newest when it resolves, install it.
    pub async fn refresh(&self, scale: Scale, octave: Octave) {
        let Some(ticket) = self.begin() else {
            return;
        };
        let result = self.source.fetch_prompt(scale, octave).await;
        self.complete(ticket, result);
    }

    fn begin(&self) -> Option<FetchTicket> {
        let mut state = self.lock();
        if state.suspended {
            return None;
        }
        state.newest_issued += 1;
        Some(FetchTicket {
            seq: state.newest_issued,
        })
    }

    /// Install a fetch result. Returns true when the result was installed;
    /// stale or failed fetches leave the current prompt untouched.
    fn complete(&self, ticket: FetchTicket, result: Result<NotePrompt, ApiError>) -> bool {
        let prompt = match result {
            Ok(prompt) => prompt,
            Err(err) => {
                tracing::warn!(error = %err, "failed to fetch note prompt");
                return false;
            }
        };

        let mut state = self.lock();
        if state.suspended || ticket.seq != state.newest_issued {
            tracing::debug!(seq = ticket.seq, "discarding stale prompt fetch");
            return false;
        }
        let cue = cue_for(prompt.note);
        state.current = Some(ActivePrompt { prompt, cue });
        true
    }

    // Single-writer UI state; a poisoned lock only means a prior panic
    // mid-update, so recover the data rather than cascade.
    fn lock(&self) -> std::sync::MutexGuard<'_, PromptState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use api::InMemoryPromptSource;
    use sightread_core::model::{Note, NoteName};

    fn prompt(name: &str) -> NotePrompt {
        NotePrompt {
            score_xml: format!("<score>{name}</score>"),
            note: Note::new(
                name.parse::<NoteName>().unwrap(),
                Octave::new(4).unwrap(),
            ),
        }
    }

    fn service() -> PromptService {
        PromptService::new(Arc::new(InMemoryPromptSource::new()))
    }

    #[test]
    fn newest_fetch_wins_regardless_of_resolution_order() {
        let service = service();
        let slow = service.begin().unwrap();
        let fast = service.begin().unwrap();

        // the later-issued fetch resolves first
        assert!(service.complete(fast, Ok(prompt("D"))));
        // the earlier fetch resolves late and is discarded
        assert!(!service.complete(slow, Ok(prompt("C"))));

        let current = service.current().unwrap();
        assert_eq!(current.prompt.note.name.to_string(), "D");
    }

    #[test]
    fn failed_fetch_keeps_previous_prompt() {
        let service = service();
        let first = service.begin().unwrap();
        assert!(service.complete(first, Ok(prompt("C"))));

        let second = service.begin().unwrap();
        let failed = service.complete(
            second,
            Err(ApiError::Backend {
                message: "down".into(),
            }),
        );
        assert!(!failed);
        assert_eq!(
            service.current().unwrap().prompt.note.name.to_string(),
            "C"
        );
    }

    #[test]
    fn suspended_service_issues_no_tickets() {
        let service = service();
        service.suspend();
        assert!(service.begin().is_none());
        service.resume();
        assert!(service.begin().is_some());
    }

    #[test]
    fn suspension_drops_inflight_results() {
        let service = service();
        let ticket = service.begin().unwrap();
        service.suspend();
        assert!(!service.complete(ticket, Ok(prompt("C"))));
        assert!(service.current().is_none());
    }

    #[tokio::test]
    async fn refresh_installs_prompt_and_cue() {
        let source = InMemoryPromptSource::new();
        source.push(prompt("C#"));
        let service = PromptService::new(Arc::new(source));

        service.refresh(Scale::C, Octave::new(4).unwrap()).await;

        let current = service.current().unwrap();
        assert_eq!(current.prompt.note.name.to_string(), "C#");
        assert_eq!(current.cue, Some("/audio/marimba-csharp4.mp3"));
    }
}
