//! The narrow interfaces the session loop talks to. Every external
//! collaborator (microphone, speech synthesis, OCR, LLM, document host) sits
//! behind one of these traits.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Shown (and stored) when the environment cannot capture the screen.
pub const SCREEN_CAPTURE_UNSUPPORTED: &str = "Screen capture is not supported in this environment.";

/// Outcome of waiting for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Heard {
    Command(String),
    /// Nothing usable was said or typed; wait again.
    Nothing,
    /// The input source is closed and will never produce another command.
    EndOfInput,
}

#[async_trait]
pub trait Transcriber: Send {
    async fn next_command(&mut self) -> Heard;
}

/// Output is fire-and-forget; implementations log their own failures.
#[async_trait]
pub trait Speaker: Send + Sync {
    async fn speak(&self, text: &str);
}

/// Returns recognized text, or [`SCREEN_CAPTURE_UNSUPPORTED`]. Never fails.
#[async_trait]
pub trait ScreenTextExtractor: Send + Sync {
    async fn extract(&self) -> String;
}

#[async_trait]
pub trait LanguageModel: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentReference {
    pub id: String,
    pub url: String,
}

#[async_trait]
pub trait DocumentPublisher: Send {
    async fn publish(&mut self, content: &str, title: &str) -> Result<DocumentReference>;
}

/// Every provider the session needs, built once at startup.
pub struct Capabilities {
    pub transcriber: Box<dyn Transcriber>,
    pub speaker: Box<dyn Speaker>,
    pub screen: Box<dyn ScreenTextExtractor>,
    pub llm: Box<dyn LanguageModel>,
    pub publisher: Box<dyn DocumentPublisher>,
}
