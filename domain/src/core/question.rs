//! Question value object

use super::error::DomainError;
use serde::{Deserialize, Serialize};

/// Default upper bound on question length, in characters.
pub const DEFAULT_MAX_QUESTION_CHARS: usize = 2000;

/// A forecasting question (Value Object)
///
/// Always non-empty and within the configured length bound; the surrounding
/// whitespace is trimmed on construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    content: String,
}

impl Question {
    /// Validate and create a question with the default length bound.
    pub fn parse(content: impl AsRef<str>) -> Result<Self, DomainError> {
        Self::parse_with_limit(content, DEFAULT_MAX_QUESTION_CHARS)
    }

    /// Validate and create a question, rejecting empty or oversized input.
    pub fn parse_with_limit(content: impl AsRef<str>, max_chars: usize) -> Result<Self, DomainError> {
        let trimmed = content.as_ref().trim();
        if trimmed.is_empty() {
            return Err(DomainError::InvalidQuestion(
                "question cannot be empty".to_string(),
            ));
        }
        let len = trimmed.chars().count();
        if len > max_chars {
            return Err(DomainError::QuestionTooLong { len, max: max_chars });
        }
        Ok(Self {
            content: trimmed.to_string(),
        })
    }

    /// Get the question content
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Consume and return the inner content
    pub fn into_content(self) -> String {
        self.content
    }
}

impl std::fmt::Display for Question {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.content)
    }
}

impl TryFrom<&str> for Question {
    type Error = DomainError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Question::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_question_parse_trims() {
        let q = Question::parse("  Will oil exceed $100?  ").unwrap();
        assert_eq!(q.content(), "Will oil exceed $100?");
    }

    #[test]
    fn test_empty_question_rejected() {
        assert!(matches!(
            Question::parse(""),
            Err(DomainError::InvalidQuestion(_))
        ));
        assert!(matches!(
            Question::parse("   \n\t"),
            Err(DomainError::InvalidQuestion(_))
        ));
    }

    #[test]
    fn test_oversized_question_rejected() {
        let long = "a".repeat(DEFAULT_MAX_QUESTION_CHARS + 1);
        assert_eq!(
            Question::parse(&long),
            Err(DomainError::QuestionTooLong {
                len: DEFAULT_MAX_QUESTION_CHARS + 1,
                max: DEFAULT_MAX_QUESTION_CHARS
            })
        );
    }

    #[test]
    fn test_limit_counts_characters_not_bytes() {
        let q = "é".repeat(10);
        assert!(Question::parse_with_limit(&q, 10).is_ok());
        assert!(Question::parse_with_limit(&q, 9).is_err());
    }

    #[test]
    fn test_try_from_str() {
        let q: Question = "Will the ceasefire hold?".try_into().unwrap();
        assert_eq!(q.to_string(), "Will the ceasefire hold?");
    }
}
