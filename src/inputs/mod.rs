pub mod keyboard;
pub mod microphone;

pub use keyboard::KeyboardTranscriber;
pub use microphone::MicrophoneTranscriber;
