use async_trait::async_trait;
use std::time::Duration;
use tracing::{info, warn};

use crate::audio::{capture, processing};
use crate::error::Result;
use crate::services::capabilities::{Heard, Transcriber};
use crate::services::stt::SpeechToText;

/// Records one spoken command from the default microphone and transcribes it.
pub struct MicrophoneTranscriber {
    stt: SpeechToText,
    listen_window: Duration,
    max_utterance: Duration,
}

impl MicrophoneTranscriber {
    pub fn new(stt: SpeechToText) -> Result<Self> {
        let device = capture::ensure_input_device()?;
        info!("Microphone input on '{}'", device);
        Ok(Self {
            stt,
            listen_window: processing::LISTEN_WINDOW,
            max_utterance: processing::MAX_UTTERANCE,
        })
    }
}

#[async_trait]
impl Transcriber for MicrophoneTranscriber {
    async fn next_command(&mut self) -> Heard {
        println!("Listening for a command...");

        let (window, max) = (self.listen_window, self.max_utterance);
        let recorded = tokio::task::spawn_blocking(move || processing::record_from_default_device(window, max)).await;

        let utterance = match recorded {
            Ok(Ok(Some(utterance))) => utterance,
            Ok(Ok(None)) => return Heard::Nothing,
            Ok(Err(e)) => {
                warn!("Recording failed: {}", e);
                return Heard::Nothing;
            }
            Err(e) => {
                warn!("Recording task failed: {}", e);
                return Heard::Nothing;
            }
        };

        let wav = match utterance.to_wav() {
            Ok(wav) => wav,
            Err(e) => {
                warn!("{}", e);
                return Heard::Nothing;
            }
        };

        match self.stt.transcribe(wav).await {
            Ok(text) if text.is_empty() => {
                println!("Sorry, I didn't understand that.");
                Heard::Nothing
            }
            Ok(text) => {
                println!("You said: {}", text);
                Heard::Command(text)
            }
            Err(e) => {
                warn!("Transcription failed: {}", e);
                println!("Sorry, there was an issue with the speech recognition service.");
                Heard::Nothing
            }
        }
    }
}
