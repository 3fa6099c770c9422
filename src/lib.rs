pub mod error;
pub mod config;
pub mod intent;
pub mod memory;
pub mod session;
pub mod services;
pub mod inputs;
pub mod outputs;
pub mod audio;
pub mod vision;

pub use error::{Error, Result};
pub use session::Session;
