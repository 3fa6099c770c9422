//! Response text for each intent. Everything here is pure; the session loop
//! owns the I/O around it.

use crate::memory::MemoryRecord;
use crate::services::capabilities::DocumentReference;

pub const NOTHING_REMEMBERED: &str = "I don't have any notes saved yet.";
pub const RECALL_HEADER: &str = "Here's what I remember:";
pub const FAILURE_NOTICE: &str = "Sorry, something went wrong while handling that request. Please try again.";
pub const MANUAL_TITLE: &str = "DS Assistant Manual";

/// Words removed from a command before it is stored as a note. They are
/// removed wherever they occur, not only as the leading trigger, so a note
/// like "notebook" loses its "note" too.
pub const STRIPPED_WORDS: &[&str] = &["remember", "save", "note"];

const MANUAL_SECTIONS: &[&str] = &[
    "Permanent Memory System",
    "Screen Reading (OCR)",
    "Voice Dialog (Speech Recognition and Text-to-Speech)",
    "Google Drive Integration",
];

pub fn extract_note(command: &str) -> String {
    let mut note = command.to_lowercase();
    for word in STRIPPED_WORDS {
        note = note.replace(word, "");
    }
    note.trim().to_string()
}

pub fn remembered_response(note: &str) -> String {
    format!("I've remembered: {}", note)
}

pub fn recall_response(memory: &MemoryRecord) -> String {
    let notes = memory.notes();
    if notes.is_empty() {
        return NOTHING_REMEMBERED.to_string();
    }
    format!("{}\n{}", RECALL_HEADER, notes.join("\n"))
}

pub fn manual_content() -> String {
    let mut manual = format!("{}\n\n", MANUAL_TITLE);
    for (i, section) in MANUAL_SECTIONS.iter().enumerate() {
        manual.push_str(&format!("{}. {}\n", i + 1, section));
    }
    manual
}

pub fn export_response(reference: &DocumentReference) -> String {
    format!("Manual exported to Google Docs: {}", reference.url)
}
