//! Speech-to-text over an OpenAI-compatible `/audio/transcriptions` endpoint.

use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use crate::error::{Error, Result};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "whisper-1";

#[derive(Deserialize)]
struct TranscriptionResponse {
    text: String,
}

#[derive(Clone)]
pub struct SpeechToText {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl SpeechToText {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(Error::Config("OPENAI_API_KEY is required for microphone input".to_string()));
        }

        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
            model: model.into(),
        })
    }

    /// Transcribes a complete WAV file held in memory.
    pub async fn transcribe(&self, wav: Vec<u8>) -> Result<String> {
        let file = Part::bytes(wav).file_name("command.wav").mime_str("audio/wav")?;
        let form = Form::new().text("model", self.model.clone()).part("file", file);

        let response = self
            .client
            .post(format!("{}/audio/transcriptions", self.base_url))
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| Error::provider("speech recognition", e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::provider("speech recognition", format!("server returned {}: {}", status, body)));
        }

        let parsed: TranscriptionResponse = response
            .json()
            .await
            .map_err(|e| Error::provider("speech recognition", format!("malformed response: {}", e)))?;
        Ok(parsed.text.trim().to_string())
    }
}
