use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use sightread_core::model::{EntryId, PracticeEntry, SessionReport, UserId};

use crate::contract::EntryStore;
use crate::error::ApiError;
use crate::http::client::ApiClient;

#[derive(Debug, Serialize)]
struct NewEntryBody<'a> {
    user_id: u64,
    time_length: &'a str,
    total_questions: u32,
    correct_questions: u32,
    notes_per_minute: u32,
}

#[derive(Debug, Deserialize)]
struct SaveEntryResponse {
    #[allow(dead_code)]
    message: String,
    id: u64,
}

#[derive(Debug, Deserialize)]
struct EntryBody {
    id: u64,
    user_id: u64,
    time_length: String,
    total_questions: u32,
    correct_questions: u32,
    notes_per_minute: u32,
    created_date: DateTime<Utc>,
}

impl From<EntryBody> for PracticeEntry {
    fn from(body: EntryBody) -> Self {
        Self {
            id: EntryId::new(body.id),
            user_id: UserId::new(body.user_id),
            time_length: body.time_length,
            total_questions: body.total_questions,
            correct_questions: body.correct_questions,
            notes_per_minute: body.notes_per_minute,
            created_date: body.created_date,
        }
    }
}

/// Entry store backed by the main backend's note-game endpoints.
#[derive(Clone)]
pub struct HttpEntryStore {
    client: ApiClient,
}

impl HttpEntryStore {
    #[must_use]
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl EntryStore for HttpEntryStore {
    async fn save_entry(&self, report: &SessionReport) -> Result<EntryId, ApiError> {
        let request = self
            .client
            .transport()
            .post(self.client.config().main_endpoint("api/note-game/entry"))
            .json(&NewEntryBody {
                user_id: report.user_id().value(),
                time_length: report.time_length(),
                total_questions: report.total_questions(),
                correct_questions: report.correct_questions(),
                notes_per_minute: report.notes_per_minute(),
            })
            .build()?;

        let response = self.client.send(request).await?;
        if !response.status().is_success() {
            return Err(ApiError::from_response(response).await);
        }
        let body: SaveEntryResponse = response.json().await?;
        Ok(EntryId::new(body.id))
    }

    async fn recent_entries(&self, _user_id: UserId) -> Result<Vec<PracticeEntry>, ApiError> {
        // The backend scopes this endpoint to the bearer token's user.
        let request = self
            .client
            .transport()
            .get(self.client.config().main_endpoint("api/note-game/recent"))
            .build()?;

        let response = self.client.send(request).await?;
        if !response.status().is_success() {
            return Err(ApiError::from_response(response).await);
        }
        let bodies: Vec<EntryBody> = response.json().await?;
        Ok(bodies.into_iter().map(PracticeEntry::from).collect())
    }
}
