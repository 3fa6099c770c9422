use async_trait::async_trait;

use crate::services::capabilities::Speaker;

pub fn transcript_line(text: &str) -> String {
    format!("DS says: {}", text)
}

/// Prints responses to stdout only.
#[derive(Debug, Default)]
pub struct TextSpeaker;

#[async_trait]
impl Speaker for TextSpeaker {
    async fn speak(&self, text: &str) {
        println!("{}", transcript_line(text));
    }
}
