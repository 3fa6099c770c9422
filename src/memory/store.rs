use crate::error::{Error, Result};
use crate::memory::types::MemoryRecord;
use serde::Serialize;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use uuid::Uuid;

pub const DEFAULT_MEMORY_FILE: &str = "ds_memory.json";

/// Durable home of the [`MemoryRecord`].
pub trait MemoryStore: Send + Sync {
    /// Missing state is an empty record, never an error.
    fn load(&self) -> Result<MemoryRecord>;
    /// Replaces the durable copy with `record` in full.
    fn save(&self, record: &MemoryRecord) -> Result<()>;
}

/// JSON file store. Writes go to a sibling temp file which is then renamed
/// over the target, so a reader sees either the old or the new document.
#[derive(Debug, Clone)]
pub struct FileMemoryStore {
    path: PathBuf,
}

impl FileMemoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn corrupt(&self, reason: impl ToString) -> Error {
        Error::StorageCorrupt {
            path: self.path.display().to_string(),
            reason: reason.to_string(),
        }
    }

    fn temp_path(&self) -> PathBuf {
        let name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| DEFAULT_MEMORY_FILE.to_string());
        self.path.with_file_name(format!(".{}.{}.tmp", name, Uuid::new_v4()))
    }
}

impl MemoryStore for FileMemoryStore {
    fn load(&self) -> Result<MemoryRecord> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No memory file at {}, starting empty", self.path.display());
                return Ok(MemoryRecord::new());
            }
            Err(e) => return Err(e.into()),
        };

        serde_json::from_str(&content).map_err(|e| self.corrupt(e))
    }

    fn save(&self, record: &MemoryRecord) -> Result<()> {
        // Four-space indentation keeps files diffable against older sessions.
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
        record.serialize(&mut serializer)?;

        let tmp = self.temp_path();
        if let Err(e) = fs::write(&tmp, &buf).and_then(|_| fs::rename(&tmp, &self.path)) {
            if let Err(cleanup) = fs::remove_file(&tmp) {
                if cleanup.kind() != ErrorKind::NotFound {
                    warn!("Could not remove {}: {}", tmp.display(), cleanup);
                }
            }
            return Err(e.into());
        }

        debug!("Memory persisted to {}", self.path.display());
        Ok(())
    }
}
