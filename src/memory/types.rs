use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// The small record carried across sessions.
///
/// A field that was absent on disk stays absent when written back, one that
/// was `null` stays `null`, and keys this program does not know about are
/// kept verbatim.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MemoryRecord {
    // Outer `None`: key absent. `Some(None)`: key present as null.
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    last_screen_text: Option<Option<String>>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    user_notes: Option<Option<Vec<String>>>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

impl MemoryRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_notes<I, S>(notes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            user_notes: Some(Some(notes.into_iter().map(Into::into).collect())),
            ..Self::default()
        }
    }

    pub fn last_screen_text(&self) -> Option<&str> {
        self.last_screen_text.as_ref().and_then(|text| text.as_deref())
    }

    pub fn set_last_screen_text(&mut self, text: impl Into<String>) {
        self.last_screen_text = Some(Some(text.into()));
    }

    pub fn notes(&self) -> &[String] {
        self.user_notes
            .as_ref()
            .and_then(|notes| notes.as_deref())
            .unwrap_or_default()
    }

    pub fn push_note(&mut self, note: impl Into<String>) {
        self.user_notes
            .get_or_insert(None)
            .get_or_insert_with(Vec::new)
            .push(note.into());
    }

    pub fn is_empty(&self) -> bool {
        self.last_screen_text.is_none() && self.user_notes.is_none() && self.extra.is_empty()
    }
}
