//! Voice ports - Capturing user speech and speaking replies

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Outcome of one listening attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListenOutcome {
    /// Speech was captured and understood
    Recognized(String),
    /// Nothing usable was captured; carries a diagnostic for the user
    Failed(String),
}

impl ListenOutcome {
    /// Recognized text, if any
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Recognized(text) => Some(text),
            Self::Failed(_) => None,
        }
    }
}

/// Port for capturing one user utterance
#[cfg_attr(test, automock)]
#[async_trait]
pub trait VoiceInputPort: Send + Sync {
    /// Listen once; never fails, problems are reported as [`ListenOutcome::Failed`]
    async fn listen(&self) -> ListenOutcome;
}

/// Port for speaking a reply
#[cfg_attr(test, automock)]
#[async_trait]
pub trait VoiceOutputPort: Send + Sync {
    /// Speak `text`, returning when playback has finished
    async fn speak(&self, text: &str) -> Result<(), ApplicationError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognized_outcome_exposes_text() {
        assert_eq!(ListenOutcome::Recognized("hi".to_string()).text(), Some("hi"));
        assert_eq!(ListenOutcome::Failed("noise".to_string()).text(), None);
    }

    #[tokio::test]
    async fn mocked_voice_input() {
        let mut mock = MockVoiceInputPort::new();
        mock.expect_listen()
            .returning(|| ListenOutcome::Recognized("hello".to_string()));

        assert_eq!(mock.listen().await.text(), Some("hello"));
    }
}
