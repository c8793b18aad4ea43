//! Domain-level errors

use thiserror::Error;

/// Errors that can occur in the domain layer
#[derive(Debug, Error)]
pub enum DomainError {
    /// Message role is not one of system, user or assistant
    #[error("Invalid message role: {0}")]
    InvalidRole(String),

    /// Validation failed
    #[error("Validation failed: {0}")]
    ValidationError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_role_error_message() {
        let err = DomainError::InvalidRole("moderator".to_string());
        assert_eq!(err.to_string(), "Invalid message role: moderator");
    }

    #[test]
    fn validation_error_message() {
        let err = DomainError::ValidationError("max_tokens must be positive".to_string());
        assert_eq!(
            err.to_string(),
            "Validation failed: max_tokens must be positive"
        );
    }
}
