use std::time::Duration;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can go wrong inside the assistant.
///
/// Screen capture being unavailable is deliberately absent: that condition is
/// reported as ordinary text by the extractor, not as an error.
#[derive(Debug, Error)]
pub enum Error {
    /// The persisted memory file exists but does not hold a memory record.
    #[error("memory file {path} is corrupt: {reason}")]
    StorageCorrupt { path: String, reason: String },

    /// An external service (LLM, speech-to-text, document host) failed.
    #[error("{provider} error: {message}")]
    Provider { provider: &'static str, message: String },

    #[error("{operation} timed out after {}s", .after.as_secs())]
    Timeout { operation: &'static str, after: Duration },

    /// Microphone capture or WAV encoding failed.
    #[error("audio error: {0}")]
    Audio(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub fn provider(provider: &'static str, message: impl Into<String>) -> Self {
        Error::Provider { provider, message: message.into() }
    }
}
