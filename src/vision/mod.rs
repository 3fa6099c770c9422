pub mod pipeline;

pub use pipeline::ScreenReader;
