use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::process::Command;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::services::capabilities::{ScreenTextExtractor, SCREEN_CAPTURE_UNSUPPORTED};

pub const DEFAULT_TESSERACT: &str = "tesseract";

/// Captures the first monitor and runs it through the `tesseract` CLI.
///
/// Any failure along the way (no display, capture denied, OCR binary missing)
/// degrades to [`SCREEN_CAPTURE_UNSUPPORTED`] instead of an error.
pub struct ScreenReader {
    tesseract: String,
    scratch_dir: PathBuf,
}

impl ScreenReader {
    pub fn new(tesseract: impl Into<String>) -> Self {
        Self {
            tesseract: tesseract.into(),
            scratch_dir: std::env::temp_dir(),
        }
    }

    async fn read_screen(&self) -> Option<String> {
        let frame = self.scratch_dir.join(format!("ds-screen-{}.png", Uuid::new_v4()));

        // Capture is blocking; keep it off the async workers.
        let target = frame.clone();
        let captured = tokio::task::spawn_blocking(move || capture_screen(&target))
            .await
            .unwrap_or_else(|e| Err(format!("capture task failed: {}", e)));
        if let Err(reason) = captured {
            warn!("Screen capture unavailable: {}", reason);
            return None;
        }

        let text = self.recognize(&frame).await;
        if let Err(e) = std::fs::remove_file(&frame) {
            debug!("Could not remove {}: {}", frame.display(), e);
        }
        text
    }

    async fn recognize(&self, frame: &Path) -> Option<String> {
        let output = match Command::new(&self.tesseract).arg(frame).arg("stdout").output().await {
            Ok(output) => output,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!("OCR binary '{}' not found", self.tesseract);
                return None;
            }
            Err(e) => {
                warn!("Failed to spawn '{}': {}", self.tesseract, e);
                return None;
            }
        };

        if !output.status.success() {
            warn!(
                "OCR exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            );
            return None;
        }

        let text = String::from_utf8_lossy(&output.stdout).into_owned();
        info!("OCR recognized {} chars", text.len());
        Some(text)
    }
}

#[async_trait]
impl ScreenTextExtractor for ScreenReader {
    async fn extract(&self) -> String {
        match self.read_screen().await {
            Some(text) => text,
            None => {
                println!("Screen capture is disabled.");
                SCREEN_CAPTURE_UNSUPPORTED.to_string()
            }
        }
    }
}

fn capture_screen(target: &Path) -> Result<(), String> {
    let monitors = xcap::Monitor::all().map_err(|e| e.to_string())?;
    let monitor = monitors.first().ok_or_else(|| "no monitors found".to_string())?;
    let image = monitor.capture_image().map_err(|e| e.to_string())?;
    image.save(target).map_err(|e| e.to_string())?;
    debug!("Screen frame written to {}", target.display());
    Ok(())
}
