pub mod capture;
pub mod processing;

pub use capture::AudioCapture;
pub use processing::{record_from_default_device, Endpoint, Utterance, UtteranceDetector, UtteranceRecorder};
