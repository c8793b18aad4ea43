//! Provider identity and the fixed fallback order

use std::fmt;

use serde::{Deserialize, Serialize};

/// The chat-completion backends known to the system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// OpenAI chat completions (hosted, first in the chain)
    OpenAi,
    /// DeepSeek chat completions (hosted, second in the chain)
    DeepSeek,
    /// Local Ollama server (last resort)
    Ollama,
}

impl ProviderKind {
    /// Providers in fallback order
    pub const CHAIN: [Self; 3] = [Self::OpenAi, Self::DeepSeek, Self::Ollama];

    /// Stable name used in logs, status output and error messages
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::OpenAi => "openai",
            Self::DeepSeek => "deepseek",
            Self::Ollama => "ollama",
        }
    }

    /// Next provider in the chain; `None` after Ollama (the chain never wraps)
    #[must_use]
    pub const fn next(&self) -> Option<Self> {
        match self {
            Self::OpenAi => Some(Self::DeepSeek),
            Self::DeepSeek => Some(Self::Ollama),
            Self::Ollama => None,
        }
    }

    /// Whether the provider runs on a local inference server
    #[must_use]
    pub const fn is_local(&self) -> bool {
        matches!(self, Self::Ollama)
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chain_order_is_fixed() {
        assert_eq!(ProviderKind::OpenAi.next(), Some(ProviderKind::DeepSeek));
        assert_eq!(ProviderKind::DeepSeek.next(), Some(ProviderKind::Ollama));
        assert_eq!(ProviderKind::Ollama.next(), None);
    }

    #[test]
    fn chain_constant_matches_next() {
        let mut walked = vec![ProviderKind::CHAIN[0]];
        while let Some(next) = walked.last().and_then(ProviderKind::next) {
            walked.push(next);
        }
        assert_eq!(walked, ProviderKind::CHAIN.to_vec());
    }

    #[test]
    fn names_are_stable() {
        assert_eq!(ProviderKind::OpenAi.to_string(), "openai");
        assert_eq!(ProviderKind::DeepSeek.to_string(), "deepseek");
        assert_eq!(ProviderKind::Ollama.to_string(), "ollama");
    }

    #[test]
    fn only_ollama_is_local() {
        assert!(ProviderKind::Ollama.is_local());
        assert!(!ProviderKind::OpenAi.is_local());
        assert!(!ProviderKind::DeepSeek.is_local());
    }
}
