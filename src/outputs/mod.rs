pub mod text;
pub mod voice;

pub use text::TextSpeaker;
pub use voice::VoiceSpeaker;
