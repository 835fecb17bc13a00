//! Generation backend port
//!
//! Defines the interface for the external text-generation service. The
//! [`GenerationGateway`](crate::gateway::GenerationGateway) wraps an
//! implementation with caching, circuit breaking and retries; adapters
//! live in the infrastructure layer.

use async_trait::async_trait;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Whether a backend failure is worth retrying.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendErrorKind {
    /// Timeouts, connection errors, overload
    Transient,
    /// Invalid model id, malformed request
    Permanent,
}

impl fmt::Display for BackendErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendErrorKind::Transient => write!(f, "transient"),
            BackendErrorKind::Permanent => write!(f, "permanent"),
        }
    }
}

/// Failure reported by a backend call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind}: {reason}")]
pub struct BackendError {
    pub kind: BackendErrorKind,
    pub reason: String,
}

impl BackendError {
    pub fn transient(reason: impl Into<String>) -> Self {
        Self {
            kind: BackendErrorKind::Transient,
            reason: reason.into(),
        }
    }

    pub fn permanent(reason: impl Into<String>) -> Self {
        Self {
            kind: BackendErrorKind::Permanent,
            reason: reason.into(),
        }
    }

    pub fn is_transient(&self) -> bool {
        self.kind == BackendErrorKind::Transient
    }
}

/// External text-generation service.
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Endpoint serving `model_id`. Calls that share an endpoint share a
    /// circuit breaker.
    fn endpoint(&self, model_id: &str) -> String;

    /// Generate a completion for `prompt`.
    ///
    /// `timeout` is advisory; the gateway enforces it independently.
    async fn generate(
        &self,
        model_id: &str,
        prompt: &str,
        timeout: Duration,
    ) -> Result<String, BackendError>;
}
