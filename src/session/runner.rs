use std::future::Future;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use super::handlers::{self, FAILURE_NOTICE, MANUAL_TITLE};
use crate::error::{Error, Result};
use crate::intent::{Intent, IntentClassifier};
use crate::memory::{MemoryRecord, MemoryStore};
use crate::services::capabilities::{Capabilities, Heard};

pub const DEFAULT_CAPABILITY_TIMEOUT: Duration = Duration::from_secs(60);
/// Publishing may include the one-time browser consent, so it gets longer.
pub const DEFAULT_PUBLISH_TIMEOUT: Duration = Duration::from_secs(300);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    AwaitingCommand,
    Classifying,
    Dispatching(Intent),
    Responding,
    Stopped,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    /// Nothing was heard; no state advanced.
    Idle,
    Responded { intent: Intent, response: String },
    EndOfInput,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    Interrupted,
    InputClosed,
}

#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub capability_timeout: Duration,
    pub publish_timeout: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            capability_timeout: DEFAULT_CAPABILITY_TIMEOUT,
            publish_timeout: DEFAULT_PUBLISH_TIMEOUT,
        }
    }
}

/// The command loop: listen, classify, dispatch, persist, speak.
///
/// Strictly sequential. The memory record is owned here and written through
/// the store after every mutation. Handler failures are spoken as a generic
/// notice and never end the loop; only the shutdown token or a closed input
/// source does.
pub struct Session {
    caps: Capabilities,
    store: Box<dyn MemoryStore>,
    memory: MemoryRecord,
    classifier: IntentClassifier,
    config: SessionConfig,
    state: SessionState,
}

impl Session {
    pub fn new(caps: Capabilities, store: Box<dyn MemoryStore>, memory: MemoryRecord, config: SessionConfig) -> Self {
        Self {
            caps,
            store,
            memory,
            classifier: IntentClassifier::default(),
            config,
            state: SessionState::AwaitingCommand,
        }
    }

    /// Loads the persisted memory and builds the session around it.
    pub fn start(caps: Capabilities, store: Box<dyn MemoryStore>, config: SessionConfig) -> Result<Self> {
        let memory = store.load()?;
        info!("Memory loaded: {} notes", memory.notes().len());
        Ok(Self::new(caps, store, memory, config))
    }

    pub fn memory(&self) -> &MemoryRecord {
        &self.memory
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    fn transition(&mut self, next: SessionState) {
        if self.state == next {
            return;
        }
        debug!("Session {:?} -> {:?}", self.state, next);
        self.state = next;
    }

    pub async fn run(&mut self, shutdown: CancellationToken) -> SessionEnd {
        info!("Session loop active");

        loop {
            let outcome = tokio::select! {
                biased;
                _ = shutdown.cancelled() => None,
                outcome = self.step() => Some(outcome),
            };

            match outcome {
                None => {
                    self.transition(SessionState::Stopped);
                    info!("Session interrupted");
                    return SessionEnd::Interrupted;
                }
                Some(StepOutcome::EndOfInput) => {
                    self.transition(SessionState::Stopped);
                    info!("Input closed, ending session");
                    return SessionEnd::InputClosed;
                }
                Some(_) => {}
            }
        }
    }

    /// One pass through the loop.
    pub async fn step(&mut self) -> StepOutcome {
        self.transition(SessionState::AwaitingCommand);

        match self.caps.transcriber.next_command().await {
            Heard::Command(command) => {
                let (intent, response) = self.handle_command(&command).await;
                StepOutcome::Responded { intent, response }
            }
            Heard::Nothing => StepOutcome::Idle,
            Heard::EndOfInput => StepOutcome::EndOfInput,
        }
    }

    /// Classifies, dispatches and speaks one command. Always yields a response.
    pub async fn handle_command(&mut self, command: &str) -> (Intent, String) {
        self.transition(SessionState::Classifying);
        let intent = self.classifier.classify(command);
        info!("Intent: {}", intent);

        self.transition(SessionState::Dispatching(intent));
        let response = match self.dispatch(intent, command).await {
            Ok(response) => response,
            Err(e) => {
                error!("{} handler failed: {}", intent, e);
                FAILURE_NOTICE.to_string()
            }
        };

        // Unbounded; only the shutdown token cuts speech short.
        self.transition(SessionState::Responding);
        self.caps.speaker.speak(&response).await;
        self.transition(SessionState::AwaitingCommand);

        (intent, response)
    }

    async fn dispatch(&mut self, intent: Intent, command: &str) -> Result<String> {
        match intent {
            Intent::AnalyzeScreen => self.analyze_screen().await,
            Intent::RememberInfo => self.remember_info(command),
            Intent::RecallInfo => Ok(handlers::recall_response(&self.memory)),
            Intent::ExportManual => self.export_manual().await,
            Intent::GeneralQuery => self.complete(command).await,
        }
    }

    async fn analyze_screen(&mut self) -> Result<String> {
        let timeout = self.config.capability_timeout;
        let screen_text = bounded("screen capture", timeout, self.caps.screen.extract()).await?;
        println!("Extracted Text: {}", screen_text);

        self.memory.set_last_screen_text(screen_text.clone());
        self.persist()?;

        self.complete(&screen_text).await
    }

    fn remember_info(&mut self, command: &str) -> Result<String> {
        let note = handlers::extract_note(command);
        self.memory.push_note(note.clone());
        self.persist()?;
        Ok(handlers::remembered_response(&note))
    }

    async fn export_manual(&mut self) -> Result<String> {
        let timeout = self.config.publish_timeout;
        let manual = handlers::manual_content();
        let reference = bounded("document publishing", timeout, self.caps.publisher.publish(&manual, MANUAL_TITLE)).await??;
        Ok(handlers::export_response(&reference))
    }

    async fn complete(&self, prompt: &str) -> Result<String> {
        let timeout = self.config.capability_timeout;
        bounded("language model", timeout, self.caps.llm.complete(prompt)).await?
    }

    fn persist(&self) -> Result<()> {
        self.store.save(&self.memory)
    }
}

async fn bounded<F: Future>(operation: &'static str, after: Duration, fut: F) -> Result<F::Output> {
    tokio::time::timeout(after, fut)
        .await
        .map_err(|_| Error::Timeout { operation, after })
}
