#![allow(dead_code)]

use async_trait::async_trait;
use ds_assistant::error::{Error, Result};
use ds_assistant::memory::FileMemoryStore;
use ds_assistant::services::docs::publisher::document_url;
use ds_assistant::services::{
    Capabilities, DocumentPublisher, DocumentReference, Heard, LanguageModel, ScreenTextExtractor, Speaker,
    Transcriber,
};
use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use uuid::Uuid;

pub fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("ds_test_{}_{}.json", name, Uuid::new_v4()))
}

pub fn store_at(path: &PathBuf) -> Box<FileMemoryStore> {
    Box::new(FileMemoryStore::new(path.clone()))
}

/// Plays back a fixed list of inputs, then reports the input closed.
pub struct ScriptedTranscriber {
    script: VecDeque<Heard>,
}

impl ScriptedTranscriber {
    pub fn commands(commands: &[&str]) -> Self {
        Self::new(commands.iter().map(|c| Heard::Command(c.to_string())).collect())
    }

    pub fn new(script: Vec<Heard>) -> Self {
        Self { script: script.into() }
    }
}

#[async_trait]
impl Transcriber for ScriptedTranscriber {
    async fn next_command(&mut self) -> Heard {
        self.script.pop_front().unwrap_or(Heard::EndOfInput)
    }
}

/// Never produces a command.
pub struct SilentTranscriber;

#[async_trait]
impl Transcriber for SilentTranscriber {
    async fn next_command(&mut self) -> Heard {
        std::future::pending::<()>().await;
        Heard::Nothing
    }
}

#[derive(Clone, Default)]
pub struct RecordingSpeaker {
    pub spoken: Arc<Mutex<Vec<String>>>,
}

impl RecordingSpeaker {
    pub fn lines(&self) -> Vec<String> {
        self.spoken.lock().unwrap().clone()
    }
}

#[async_trait]
impl Speaker for RecordingSpeaker {
    async fn speak(&self, text: &str) {
        self.spoken.lock().unwrap().push(text.to_string());
    }
}

/// Takes `delay` to say anything; records a line only once it has been said in full.
#[derive(Clone)]
pub struct SlowSpeaker {
    delay: Duration,
    finished: Arc<Mutex<Vec<String>>>,
}

impl SlowSpeaker {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            finished: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn finished(&self) -> Vec<String> {
        self.finished.lock().unwrap().clone()
    }
}

#[async_trait]
impl Speaker for SlowSpeaker {
    async fn speak(&self, text: &str) {
        tokio::time::sleep(self.delay).await;
        self.finished.lock().unwrap().push(text.to_string());
    }
}

pub struct FixedScreen(pub String);

#[async_trait]
impl ScreenTextExtractor for FixedScreen {
    async fn extract(&self) -> String {
        self.0.clone()
    }
}

/// Answers `echo: <prompt>` and remembers every prompt.
#[derive(Clone, Default)]
pub struct EchoModel {
    pub prompts: Arc<Mutex<Vec<String>>>,
}

#[async_trait]
impl LanguageModel for EchoModel {
    async fn complete(&self, prompt: &str) -> Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        Ok(format!("echo: {}", prompt))
    }
}

pub struct FailingModel;

#[async_trait]
impl LanguageModel for FailingModel {
    async fn complete(&self, _prompt: &str) -> Result<String> {
        Err(Error::provider("language model", "quota exceeded"))
    }
}

pub struct SlowModel(pub Duration);

#[async_trait]
impl LanguageModel for SlowModel {
    async fn complete(&self, _prompt: &str) -> Result<String> {
        tokio::time::sleep(self.0).await;
        Ok("too late".to_string())
    }
}

#[derive(Clone, Default)]
pub struct RecordingPublisher {
    pub published: Arc<Mutex<Vec<(String, String)>>>,
}

#[async_trait]
impl DocumentPublisher for RecordingPublisher {
    async fn publish(&mut self, content: &str, title: &str) -> Result<DocumentReference> {
        self.published.lock().unwrap().push((content.to_string(), title.to_string()));
        Ok(DocumentReference {
            id: "doc123".to_string(),
            url: document_url("doc123"),
        })
    }
}

pub struct Fakes {
    pub speaker: RecordingSpeaker,
    pub llm: EchoModel,
    pub publisher: RecordingPublisher,
}

/// Capabilities wired to in-process fakes. `screen` is what the extractor returns.
pub fn fake_capabilities(transcriber: impl Transcriber + 'static, screen: &str) -> (Capabilities, Fakes) {
    let fakes = Fakes {
        speaker: RecordingSpeaker::default(),
        llm: EchoModel::default(),
        publisher: RecordingPublisher::default(),
    };
    let caps = Capabilities {
        transcriber: Box::new(transcriber),
        speaker: Box::new(fakes.speaker.clone()),
        screen: Box::new(FixedScreen(screen.to_string())),
        llm: Box::new(fakes.llm.clone()),
        publisher: Box::new(fakes.publisher.clone()),
    };
    (caps, fakes)
}
