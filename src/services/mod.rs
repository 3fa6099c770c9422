pub mod capabilities;
pub mod llm;
pub mod stt;
pub mod docs;

pub use capabilities::*;
