use async_trait::async_trait;
use std::io::{BufRead, BufReader, ErrorKind, Write};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::services::capabilities::{Heard, Transcriber};

pub const PROMPT: &str = "Type your command: ";

enum Line {
    Text(String),
    /// Not valid UTF-8.
    Garbled,
}

/// Reads one command per line of text input.
///
/// Lines are read on a dedicated OS thread and handed over a channel. A
/// blocked read never holds up runtime shutdown, so Ctrl-C exits even while
/// waiting for the user.
pub struct KeyboardTranscriber {
    lines: mpsc::Receiver<Line>,
    prompt: bool,
}

impl KeyboardTranscriber {
    pub fn stdin() -> Self {
        let mut transcriber = Self::new(BufReader::new(std::io::stdin()));
        transcriber.prompt = true;
        transcriber
    }

    /// Reader without the interactive prompt, e.g. piped scripts.
    pub fn new<R: BufRead + Send + 'static>(reader: R) -> Self {
        let (tx, rx) = mpsc::channel(1);
        std::thread::spawn(move || read_lines(reader, tx));
        Self { lines: rx, prompt: false }
    }
}

fn read_lines<R: BufRead>(mut reader: R, tx: mpsc::Sender<Line>) {
    let mut buf = Vec::new();
    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf) {
            Ok(0) => break,
            Ok(_) => {
                let line = match String::from_utf8(buf.clone()) {
                    Ok(text) => Line::Text(text),
                    Err(_) => Line::Garbled,
                };
                if tx.blocking_send(line).is_err() {
                    break;
                }
            }
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => {
                warn!("Failed to read input: {}", e);
                break;
            }
        }
    }
    debug!("Input reader finished");
}

#[async_trait]
impl Transcriber for KeyboardTranscriber {
    async fn next_command(&mut self) -> Heard {
        if self.prompt {
            print!("{}", PROMPT);
            let _ = std::io::stdout().flush();
        }

        match self.lines.recv().await {
            Some(Line::Text(line)) => {
                let line = line.trim_end_matches(['\n', '\r']);
                if line.trim().is_empty() {
                    Heard::Nothing
                } else {
                    Heard::Command(line.to_string())
                }
            }
            Some(Line::Garbled) => {
                warn!("Ignoring input line that is not valid UTF-8");
                Heard::Nothing
            }
            None => Heard::EndOfInput,
        }
    }
}
