use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, warn};

use super::text::transcript_line;
use crate::services::capabilities::Speaker;

pub const DEFAULT_VOICE_COMMAND: &str = "say";

/// Prints the response, then reads it aloud with an external TTS program
/// (`say` on macOS, `espeak` elsewhere). Waits for playback to finish so the
/// next prompt does not talk over it.
#[derive(Debug)]
pub struct VoiceSpeaker {
    program: String,
}

impl VoiceSpeaker {
    pub fn new(program: impl Into<String>) -> Self {
        Self { program: program.into() }
    }
}

#[async_trait]
impl Speaker for VoiceSpeaker {
    async fn speak(&self, text: &str) {
        println!("{}", transcript_line(text));

        debug!("Spawning '{}'", self.program);
        match Command::new(&self.program).arg(text).kill_on_drop(true).status().await {
            Ok(status) if !status.success() => warn!("'{}' exited with {}", self.program, status),
            Ok(_) => {}
            Err(e) => warn!("Failed to spawn '{}': {}", self.program, e),
        }
    }
}
