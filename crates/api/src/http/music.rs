use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use sightread_core::model::{Note, Octave, Scale};

use crate::config::BackendConfig;
use crate::contract::{NotePrompt, PromptSource};
use crate::error::ApiError;

#[derive(Debug, Serialize)]
struct NoteGameRequest<'a> {
    tonic: &'a str,
    octave: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NoteGameResponse {
    generated_xml: String,
    note_name: String,
    note_octave: String,
}

/// Prompt source backed by the music-generation backend.
///
/// The music backend is a separate, unauthenticated service; it shares the
/// transport but not the token store.
#[derive(Clone)]
pub struct HttpMusicBackend {
    http: reqwest::Client,
    config: BackendConfig,
}

impl HttpMusicBackend {
    #[must_use]
    pub fn new(http: reqwest::Client, config: BackendConfig) -> Self {
        Self { http, config }
    }
}

#[async_trait]
impl PromptSource for HttpMusicBackend {
    async fn fetch_prompt(&self, scale: Scale, octave: Octave) -> Result<NotePrompt, ApiError> {
        let response = self
            .http
            .post(self.config.music_endpoint("note-game"))
            .json(&NoteGameRequest {
                tonic: scale.as_str(),
                octave: octave.to_string(),
            })
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(ApiError::from_response(response).await);
        }

        let body: NoteGameResponse = response.json().await?;
        let name = body
            .note_name
            .parse()
            .map_err(|_| ApiError::Malformed(format!("note name {:?}", body.note_name)))?;
        let octave = body
            .note_octave
            .parse()
            .map_err(|_| ApiError::Malformed(format!("note octave {:?}", body.note_octave)))?;

        Ok(NotePrompt {
            score_xml: body.generated_xml,
            note: Note::new(name, octave),
        })
    }
}
