//! Structured configuration issues.
//!
//! Loaders validate settings and return a list of issues instead of failing
//! on the first problem. Callers abort on [`Severity::Error`] and log
//! [`Severity::Warning`].

use std::fmt;

/// Severity level of a configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Fatal: the configuration cannot work at all.
    Error,
    /// Non-fatal: the configuration works but may not behave as expected.
    Warning,
}

/// Identifies a specific configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigIssueCode {
    /// A probability-like threshold outside [0, 1].
    ThresholdOutOfRange,
    /// A timeout, TTL or window that must be positive is zero.
    ZeroDuration,
    /// The round deadline is shorter than a single call timeout.
    DeadlineShorterThanCall,
    /// An agent override failed profile validation.
    InvalidAgent,
    /// Two agent overrides share a name.
    DuplicateAgent,
    /// The backend URL is not http(s).
    InvalidBackendUrl,
    /// Requery is configured but its budget is zero.
    RequeryWithoutBudget,
}

impl ConfigIssueCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfigIssueCode::ThresholdOutOfRange => "threshold_out_of_range",
            ConfigIssueCode::ZeroDuration => "zero_duration",
            ConfigIssueCode::DeadlineShorterThanCall => "deadline_shorter_than_call",
            ConfigIssueCode::InvalidAgent => "invalid_agent",
            ConfigIssueCode::DuplicateAgent => "duplicate_agent",
            ConfigIssueCode::InvalidBackendUrl => "invalid_backend_url",
            ConfigIssueCode::RequeryWithoutBudget => "requery_without_budget",
        }
    }
}

/// A detected issue in the configuration.
#[derive(Debug, Clone)]
pub struct ConfigIssue {
    pub severity: Severity,
    pub code: ConfigIssueCode,
    pub message: String,
}

impl ConfigIssue {
    pub fn error(code: ConfigIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            code,
            message: message.into(),
        }
    }

    pub fn warning(code: ConfigIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            code,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        write!(f, "[{level}] {}: {}", self.code.as_str(), self.message)
    }
}
