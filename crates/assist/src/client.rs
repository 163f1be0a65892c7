//! HTTP client for the transcription and chat-completion endpoints.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::Deserialize;

use crate::config::{AssistConfig, SUGGEST_MAX_TOKENS, SUGGEST_TEMPERATURE};
use crate::error::AssistError;
use crate::prompt::{render_user_prompt, SYSTEM_PROMPT};

/// Client for one OpenAI-compatible provider.
#[derive(Debug, Clone)]
pub struct AssistClient {
    client: reqwest::Client,
    config: AssistConfig,
}

#[derive(Debug, Deserialize)]
struct TranscriptionResponse {
    text: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

impl AssistClient {
    /// Build a client whose requests are bounded by `config.timeout_secs`.
    pub fn new(config: AssistConfig) -> Result<Self, AssistError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &AssistConfig {
        &self.config
    }

    /// Transcribe an audio clip to text.
    ///
    /// Sends a multipart `POST /audio/transcriptions`.
    pub async fn transcribe(
        &self,
        audio: Vec<u8>,
        file_name: &str,
        content_type: Option<&str>,
    ) -> Result<String, AssistError> {
        let api_key = self.api_key()?;

        let mut part = reqwest::multipart::Part::bytes(audio).file_name(file_name.to_string());
        if let Some(mime) = content_type {
            part = part.mime_str(mime)?;
        }
        let form = reqwest::multipart::Form::new()
            .text("model", self.config.transcribe_model.clone())
            .part("file", part);

        let response = self
            .client
            .post(format!("{}/audio/transcriptions", self.config.base_url))
            .bearer_auth(api_key)
            .multipart(form)
            .send()
            .await?;

        let body: TranscriptionResponse = Self::parse_response(response).await?;
        tracing::debug!(chars = body.text.len(), "Transcription received");
        Ok(body.text)
    }

    /// Suggest an answer to `question`, informed by earlier answers.
    ///
    /// Sends `POST /chat/completions`. An empty completion yields an empty
    /// string.
    pub async fn suggest(
        &self,
        question: &str,
        previous_answers: &BTreeMap<String, String>,
        context: Option<&str>,
    ) -> Result<String, AssistError> {
        let api_key = self.api_key()?;

        let body = serde_json::json!({
            "model": self.config.suggest_model,
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                {
                    "role": "user",
                    "content": render_user_prompt(question, previous_answers, context),
                },
            ],
            "max_tokens": SUGGEST_MAX_TOKENS,
            "temperature": SUGGEST_TEMPERATURE,
        });

        let response = self
            .client
            .post(format!("{}/chat/completions", self.config.base_url))
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await?;

        let chat: ChatResponse = Self::parse_response(response).await?;
        let suggestion = chat
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(|s| s.trim().to_string())
            .unwrap_or_default();
        Ok(suggestion)
    }

    // ---- private helpers ----

    fn api_key(&self) -> Result<&str, AssistError> {
        self.config
            .api_key
            .as_deref()
            .ok_or(AssistError::NotConfigured)
    }

    /// Return the response unchanged on success, or an
    /// [`AssistError::ApiError`] carrying the status and body text.
    async fn ensure_success(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, AssistError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(AssistError::ApiError {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, AssistError> {
        let response = Self::ensure_success(response).await?;
        Ok(response.json::<T>().await?)
    }
}
