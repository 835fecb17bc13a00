//! Agent registry source port
//!
//! Loaded once per round, so file-backed sources pick up edits between
//! rounds without a restart.

use async_trait::async_trait;
use foresight_domain::{AgentRegistry, DomainError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AgentSourceError {
    #[error("Failed to read agent definitions: {0}")]
    Read(String),

    #[error("Invalid agent definitions: {0}")]
    Invalid(#[from] DomainError),
}

#[async_trait]
pub trait AgentSource: Send + Sync {
    async fn load(&self) -> Result<AgentRegistry, AgentSourceError>;
}

/// Fixed registry, for tests and configurations without agent overrides.
pub struct StaticAgentSource {
    registry: AgentRegistry,
}

impl StaticAgentSource {
    pub fn new(registry: AgentRegistry) -> Self {
        Self { registry }
    }
}

impl Default for StaticAgentSource {
    fn default() -> Self {
        Self::new(AgentRegistry::builtin())
    }
}

#[async_trait]
impl AgentSource for StaticAgentSource {
    async fn load(&self) -> Result<AgentRegistry, AgentSourceError> {
        Ok(self.registry.clone())
    }
}
