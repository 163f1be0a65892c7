//! Public speech-to-text and answer-suggestion endpoints.
//!
//! Both are stateless. Provider failures map to 502 and never touch
//! submissions.

use std::collections::BTreeMap;

use axum::extract::{Multipart, State};
use axum::response::IntoResponse;
use axum::Json;
use formstep_core::error::CoreError;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Largest accepted audio upload.
pub const MAX_AUDIO_BYTES: usize = 25 * 1024 * 1024;

const DEFAULT_AUDIO_NAME: &str = "recording.webm";

#[derive(Debug, Serialize)]
pub struct Transcription {
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct SuggestRequest {
    #[serde(default)]
    pub question: String,
    /// Earlier answers keyed by question label.
    #[serde(default, alias = "previousAnswers")]
    pub previous_answers: BTreeMap<String, String>,
    pub context: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct Suggestion {
    pub suggestion: String,
}

// ---------------------------------------------------------------------------
// POST /ai/transcribe
// ---------------------------------------------------------------------------

/// Transcribe the multipart `file` part.
pub async fn transcribe(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<impl IntoResponse> {
    let mut audio = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field
            .file_name()
            .filter(|n| !n.is_empty())
            .unwrap_or(DEFAULT_AUDIO_NAME)
            .to_string();
        let content_type = field.content_type().map(str::to_string);
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?;
        audio = Some((data, file_name, content_type));
        break;
    }

    let (data, file_name, content_type) =
        audio.ok_or_else(|| AppError::BadRequest("No file provided".to_string()))?;
    if data.is_empty() {
        return Err(AppError::BadRequest("Uploaded file is empty".to_string()));
    }

    let size = data.len();
    let text = state
        .assist
        .transcribe(data.to_vec(), &file_name, content_type.as_deref())
        .await?;

    tracing::info!(bytes = size, chars = text.len(), "Audio transcribed");
    Ok(Json(DataResponse {
        data: Transcription { text },
    }))
}

// ---------------------------------------------------------------------------
// POST /ai/suggest
// ---------------------------------------------------------------------------

/// Suggest an answer to `question` given the respondent's earlier answers.
pub async fn suggest(
    State(state): State<AppState>,
    Json(input): Json<SuggestRequest>,
) -> AppResult<impl IntoResponse> {
    if input.question.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "No question provided".to_string(),
        )));
    }

    let suggestion = state
        .assist
        .suggest(
            &input.question,
            &input.previous_answers,
            input.context.as_deref(),
        )
        .await?;

    tracing::info!(chars = suggestion.len(), "Suggestion generated");
    Ok(Json(DataResponse {
        data: Suggestion { suggestion },
    }))
}
