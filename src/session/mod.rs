pub mod handlers;
pub mod runner;

pub use runner::{Session, SessionConfig, SessionEnd, SessionState, StepOutcome};
