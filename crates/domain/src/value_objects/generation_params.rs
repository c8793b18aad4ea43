//! Generation parameters value object
//!
//! Sampling settings sent along with every chat request.
//!
//! # Examples
//!
//! ```
//! use domain::value_objects::GenerationParams;
//!
//! let params = GenerationParams::new(150, 0.7).expect("valid parameters");
//! assert_eq!(params.max_tokens(), 150);
//!
//! // Zero tokens or out-of-range temperatures are rejected
//! assert!(GenerationParams::new(0, 0.7).is_err());
//! assert!(GenerationParams::new(100, 2.5).is_err());
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// Validated generation parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawGenerationParams")]
pub struct GenerationParams {
    max_tokens: u32,
    temperature: f32,
}

#[derive(Deserialize)]
struct RawGenerationParams {
    max_tokens: u32,
    temperature: f32,
}

impl TryFrom<RawGenerationParams> for GenerationParams {
    type Error = DomainError;

    fn try_from(raw: RawGenerationParams) -> Result<Self, Self::Error> {
        Self::new(raw.max_tokens, raw.temperature)
    }
}

impl GenerationParams {
    /// Lowest accepted temperature
    pub const MIN_TEMPERATURE: f32 = 0.0;
    /// Highest accepted temperature
    pub const MAX_TEMPERATURE: f32 = 2.0;

    /// Create validated parameters
    ///
    /// # Errors
    ///
    /// Returns `DomainError::ValidationError` if `max_tokens` is zero or the
    /// temperature is outside `0.0..=2.0`.
    pub fn new(max_tokens: u32, temperature: f32) -> Result<Self, DomainError> {
        if max_tokens == 0 {
            return Err(DomainError::ValidationError(
                "max_tokens must be a positive integer".to_string(),
            ));
        }
        if !(Self::MIN_TEMPERATURE..=Self::MAX_TEMPERATURE).contains(&temperature) {
            return Err(DomainError::ValidationError(format!(
                "temperature {temperature} is out of range (must be 0.0-2.0)"
            )));
        }
        Ok(Self {
            max_tokens,
            temperature,
        })
    }

    /// Maximum number of tokens to generate
    pub const fn max_tokens(&self) -> u32 {
        self.max_tokens
    }

    /// Sampling temperature
    pub const fn temperature(&self) -> f32 {
        self.temperature
    }
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            max_tokens: 150,
            temperature: 0.7,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_assistant_defaults() {
        let params = GenerationParams::default();
        assert_eq!(params.max_tokens(), 150);
        assert!((params.temperature() - 0.7).abs() < f32::EPSILON);
    }

    #[test]
    fn accepts_boundaries() {
        assert!(GenerationParams::new(1, 0.0).is_ok());
        assert!(GenerationParams::new(u32::MAX, 2.0).is_ok());
    }

    #[test]
    fn rejects_zero_tokens() {
        let err = GenerationParams::new(0, 0.5).unwrap_err();
        assert!(err.to_string().contains("max_tokens"));
    }

    #[test]
    fn rejects_nan_temperature() {
        assert!(GenerationParams::new(10, f32::NAN).is_err());
    }

    #[test]
    fn rejects_negative_temperature() {
        assert!(GenerationParams::new(10, -0.1).is_err());
    }

    #[test]
    fn deserialization_validates() {
        let ok: GenerationParams =
            serde_json::from_str(r#"{"max_tokens":64,"temperature":1.2}"#).unwrap();
        assert_eq!(ok.max_tokens(), 64);

        let bad = serde_json::from_str::<GenerationParams>(r#"{"max_tokens":0,"temperature":1.0}"#);
        assert!(bad.is_err());
    }
}
