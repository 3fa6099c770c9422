use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use crate::error::{Error, Result};
use crate::services::capabilities::LanguageModel;

pub const DEFAULT_BASE_URL: &str = "https://api.deepseek.com";
pub const DEFAULT_MODEL: &str = "deepseek-chat";
const SYSTEM_PROMPT: &str = "You are a helpful assistant.";

/// Chat-completions client for DeepSeek (or any OpenAI-compatible server).
#[derive(Clone)]
pub struct LLMService {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    stream: bool,
}

#[derive(Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

impl LLMService {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(Error::Config("DEEPSEEK_API_KEY environment variable is not set.".to_string()));
        }

        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
            model: model.into(),
        })
    }

    pub async fn chat(&self, text: &str) -> Result<String> {
        let request_body = CompletionRequest {
            model: &self.model,
            messages: vec![
                ChatMessage { role: "system", content: SYSTEM_PROMPT },
                ChatMessage { role: "user", content: text },
            ],
            stream: false, // One-shot only
        };

        debug!("Requesting completion from {} ({} chars)", self.model, text.len());
        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| Error::provider("language model", e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::provider("language model", format!("server returned {}: {}", status, body)));
        }

        let resp_json: CompletionResponse = response
            .json()
            .await
            .map_err(|e| Error::provider("language model", format!("malformed response: {}", e)))?;

        resp_json
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .ok_or_else(|| Error::provider("language model", "response contained no completion"))
    }
}

#[async_trait]
impl LanguageModel for LLMService {
    async fn complete(&self, prompt: &str) -> Result<String> {
        self.chat(prompt).await
    }
}
