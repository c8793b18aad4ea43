//! Text-only speaker for sessions without audio output

use async_trait::async_trait;
use tracing::debug;

use crate::error::SpeechError;
use crate::ports::Speaker;

/// Speaker that produces no sound
///
/// The session already echoes every reply to the terminal, so this only
/// records that a reply would have been spoken.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleSpeaker;

#[async_trait]
impl Speaker for ConsoleSpeaker {
    async fn speak(&self, text: &str) -> Result<(), SpeechError> {
        debug!(text_len = text.len(), "Voice output disabled; reply shown as text only");
        Ok(())
    }
}
