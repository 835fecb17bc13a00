//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("Invalid question: {0}")]
    InvalidQuestion(String),

    #[error("Question too long: {len} characters (max {max})")]
    QuestionTooLong { len: usize, max: usize },

    #[error("Invalid agent profile '{name}': {reason}")]
    InvalidProfile { name: String, reason: String },

    #[error("Duplicate agent name: {0}")]
    DuplicateAgent(String),

    #[error("Unknown agent: {0}")]
    UnknownAgent(String),

    #[error("Unknown domain: {0}")]
    UnknownDomain(String),

    #[error("No response carried a positive weight")]
    NoWeightedResponses,
}

impl DomainError {
    /// Check if this error was caused by caller input rather than state
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            DomainError::InvalidQuestion(_)
                | DomainError::QuestionTooLong { .. }
                | DomainError::UnknownAgent(_)
                | DomainError::UnknownDomain(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_question_too_long_display() {
        let error = DomainError::QuestionTooLong { len: 2100, max: 2000 };
        assert_eq!(
            error.to_string(),
            "Question too long: 2100 characters (max 2000)"
        );
    }

    #[test]
    fn test_is_input_error() {
        assert!(DomainError::InvalidQuestion("empty".to_string()).is_input_error());
        assert!(DomainError::UnknownAgent("x".to_string()).is_input_error());
        assert!(!DomainError::NoWeightedResponses.is_input_error());
        assert!(!DomainError::DuplicateAgent("a".to_string()).is_input_error());
    }
}
