//! Raw TOML configuration data types
//!
//! These structs mirror the config file one section at a time. Each section
//! converts itself into the application's params type and contributes its
//! own issues to [`FileConfig::validate`].

mod backend;
mod gateway;
mod output;
mod round;
mod storage;

pub use backend::FileBackendConfig;
pub use gateway::FileGatewayConfig;
pub use output::FileOutputConfig;
pub use round::{FileConsensusConfig, FileQualityConfig, FileRoundConfig};
pub use storage::{FileContextConfig, FileReputationConfig, FileStorageConfig, data_dir};

use foresight_application::ForecastParams;
use foresight_domain::{AgentProfile, ConfigIssue, ConfigIssueCode};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

/// Configuration rejected at startup.
#[derive(Error, Debug)]
pub enum ConfigValidationError {
    #[error("{} configuration error(s): {}", .0.len(), summarize(.0))]
    Invalid(Vec<ConfigIssue>),
}

fn summarize(issues: &[ConfigIssue]) -> String {
    issues
        .iter()
        .map(|i| i.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub backend: FileBackendConfig,
    pub gateway: FileGatewayConfig,
    pub round: FileRoundConfig,
    pub quality: FileQualityConfig,
    pub consensus: FileConsensusConfig,
    pub reputation: FileReputationConfig,
    pub context: FileContextConfig,
    pub storage: FileStorageConfig,
    pub output: FileOutputConfig,
    /// Profiles that replace built-in agents of the same name or add new ones
    pub agents: Vec<AgentProfile>,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        self.backend.validate(&mut issues);
        self.gateway.validate(&mut issues);
        self.round.validate(&mut issues);
        self.quality.validate(&mut issues);
        self.consensus.validate(&mut issues);
        self.reputation.validate(&mut issues);
        self.context.validate(&mut issues);

        let mut seen = HashSet::new();
        for agent in &self.agents {
            if let Err(e) = agent.validate() {
                issues.push(ConfigIssue::error(ConfigIssueCode::InvalidAgent, e.to_string()));
            }
            if !seen.insert(agent.name.to_lowercase()) {
                issues.push(ConfigIssue::error(
                    ConfigIssueCode::DuplicateAgent,
                    format!("agent '{}' is defined more than once", agent.name),
                ));
            }
        }

        issues
    }

    /// Split issues into a hard failure (any error) or the warnings to log.
    pub fn check(&self) -> Result<Vec<ConfigIssue>, ConfigValidationError> {
        let (errors, warnings): (Vec<_>, Vec<_>) =
            self.validate().into_iter().partition(ConfigIssue::is_error);
        if errors.is_empty() {
            Ok(warnings)
        } else {
            Err(ConfigValidationError::Invalid(errors))
        }
    }

    /// Parameters for a forecasting round.
    pub fn forecast_params(&self) -> ForecastParams {
        ForecastParams::default()
            .with_round(self.round.to_params())
            .with_quality(self.quality.to_params())
            .with_consensus(self.consensus.to_params())
            .with_context(self.context.to_query())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use foresight_domain::{DomainAffinity, ForecastDomain, OutputFormat, Severity};
    use std::time::Duration;

    fn codes(config: &FileConfig) -> Vec<ConfigIssueCode> {
        config.validate().into_iter().map(|i| i.code).collect()
    }

    #[test]
    fn test_deserialize_full_config() {
        let toml_str = r#"
[backend]
base_url = "http://10.0.0.5:11434"

[gateway]
max_retries = 1
failure_threshold = 3
open_timeout_secs = 30

[round]
call_timeout_secs = 20
round_deadline_secs = 90

[quality]
requery_budget = 2

[consensus]
outlier_threshold = 0.25

[output]
format = "full"
color = false

[[agents]]
name = "Grid Analyst"
persona = "You are {name}, a power-grid specialist."
model = "llama3"
base_weight = 1.3

[agents.domain_affinities]
energy = "primary"
infrastructure = "secondary"
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.backend.base_url, "http://10.0.0.5:11434");
        assert_eq!(config.output.format, Some(OutputFormat::Full));
        assert!(!config.output.color);
        assert_eq!(config.agents.len(), 1);
        let agent = &config.agents[0];
        assert_eq!(agent.affinity_for(ForecastDomain::Energy), DomainAffinity::Primary);
        assert!(agent.enabled);

        let gateway = config.gateway.to_params();
        assert_eq!(gateway.max_retries, 1);
        assert_eq!(gateway.breaker.failure_threshold, 3);
        assert_eq!(gateway.breaker.open_timeout, Duration::from_secs(30));

        let params = config.forecast_params();
        assert_eq!(params.round.call_timeout, Duration::from_secs(20));
        assert_eq!(params.quality.effective_budget(), 2);
        assert_eq!(params.consensus.outlier_threshold, 0.25);
        assert_eq!(params.consensus.review_threshold, 0.4);
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_defaults_match_application_params() {
        let config: FileConfig = toml::from_str("").unwrap();
        assert_eq!(config, FileConfig::default());
        assert_eq!(config.gateway.to_params(), foresight_application::GatewayParams::default());
        assert_eq!(config.forecast_params(), ForecastParams::default());
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_threshold_out_of_range() {
        let mut config = FileConfig::default();
        config.consensus.review_threshold = 1.5;
        config.quality.requery_threshold = -0.1;
        assert_eq!(
            codes(&config),
            vec![ConfigIssueCode::ThresholdOutOfRange, ConfigIssueCode::ThresholdOutOfRange]
        );
    }

    #[test]
    fn test_zero_timeouts_are_errors() {
        let mut config = FileConfig::default();
        config.round.call_timeout_secs = 0;
        config.gateway.open_timeout_secs = 0;
        let issues = config.validate();
        assert!(issues.iter().all(|i| i.severity == Severity::Error));
        assert!(issues.iter().all(|i| i.code == ConfigIssueCode::ZeroDuration));
        assert_eq!(issues.len(), 2);
    }

    #[test]
    fn test_short_deadline_is_warning() {
        let mut config = FileConfig::default();
        config.round.round_deadline_secs = 30;
        let warnings = config.check().unwrap();
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].code, ConfigIssueCode::DeadlineShorterThanCall);
    }

    #[test]
    fn test_requery_without_budget_warns() {
        let mut config = FileConfig::default();
        config.quality.requery_budget = 0;
        assert_eq!(codes(&config), vec![ConfigIssueCode::RequeryWithoutBudget]);

        config.quality.requery_enabled = false;
        assert!(codes(&config).is_empty());
    }

    #[test]
    fn test_invalid_backend_url() {
        let mut config = FileConfig::default();
        config.backend.base_url = "localhost:11434".to_string();
        let err = config.check().unwrap_err();
        let ConfigValidationError::Invalid(issues) = err;
        assert_eq!(issues[0].code, ConfigIssueCode::InvalidBackendUrl);
    }

    #[test]
    fn test_agent_issues() {
        let mut config = FileConfig::default();
        config.agents = vec![
            AgentProfile::new("Dup", "p", "m", 1.0),
            AgentProfile::new("dup", "p", "m", 1.0),
            AgentProfile::new("Broken", "p", "m", 0.0),
        ];
        assert_eq!(
            codes(&config),
            vec![ConfigIssueCode::DuplicateAgent, ConfigIssueCode::InvalidAgent]
        );
    }

    #[test]
    fn test_error_message_lists_issues() {
        let mut config = FileConfig::default();
        config.round.round_deadline_secs = 0;
        let err = config.check().unwrap_err();
        let msg = err.to_string();
        assert!(msg.starts_with("1 configuration error(s)"));
        assert!(msg.contains("round.round_deadline_secs cannot be 0"));
    }
}
