//! Round, quality and consensus settings from TOML

use foresight_application::{QualityParams, RoundParams};
use foresight_domain::core::question::DEFAULT_MAX_QUESTION_CHARS;
use foresight_domain::{ConfigIssue, ConfigIssueCode, ConsensusParams, QualityPolicy};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// `[round]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileRoundConfig {
    pub call_timeout_secs: u64,
    pub round_deadline_secs: u64,
    pub max_question_chars: usize,
}

impl Default for FileRoundConfig {
    fn default() -> Self {
        let params = RoundParams::default();
        Self {
            call_timeout_secs: params.call_timeout.as_secs(),
            round_deadline_secs: params.round_deadline.as_secs(),
            max_question_chars: DEFAULT_MAX_QUESTION_CHARS,
        }
    }
}

impl FileRoundConfig {
    pub fn to_params(&self) -> RoundParams {
        RoundParams::default()
            .with_call_timeout(Duration::from_secs(self.call_timeout_secs))
            .with_round_deadline(Duration::from_secs(self.round_deadline_secs))
            .with_max_question_chars(self.max_question_chars)
    }

    pub(super) fn validate(&self, issues: &mut Vec<ConfigIssue>) {
        if self.call_timeout_secs == 0 {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::ZeroDuration,
                "round.call_timeout_secs cannot be 0",
            ));
        }
        if self.round_deadline_secs == 0 {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::ZeroDuration,
                "round.round_deadline_secs cannot be 0",
            ));
        } else if self.round_deadline_secs < self.call_timeout_secs {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::DeadlineShorterThanCall,
                format!(
                    "round.round_deadline_secs ({}) is shorter than call_timeout_secs ({}); slow agents will be cut off by the deadline",
                    self.round_deadline_secs, self.call_timeout_secs
                ),
            ));
        }
        if self.max_question_chars == 0 {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::ThresholdOutOfRange,
                "round.max_question_chars must be at least 1",
            ));
        }
    }
}

/// `[quality]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileQualityConfig {
    pub requery_enabled: bool,
    pub requery_threshold: f64,
    pub requery_budget: u32,
    pub max_follow_ups: usize,
    pub min_length: usize,
}

impl Default for FileQualityConfig {
    fn default() -> Self {
        let params = QualityParams::default();
        Self {
            requery_enabled: params.requery_enabled,
            requery_threshold: params.policy.requery_threshold,
            requery_budget: params.requery_budget,
            max_follow_ups: params.policy.max_follow_ups,
            min_length: params.policy.min_length,
        }
    }
}

impl FileQualityConfig {
    pub fn to_params(&self) -> QualityParams {
        let policy = QualityPolicy::default()
            .with_requery_threshold(self.requery_threshold)
            .with_max_follow_ups(self.max_follow_ups)
            .with_min_length(self.min_length);
        let params = QualityParams::default()
            .with_policy(policy)
            .with_requery_budget(self.requery_budget);
        if self.requery_enabled {
            params
        } else {
            params.without_requery()
        }
    }

    pub(super) fn validate(&self, issues: &mut Vec<ConfigIssue>) {
        check_unit("quality.requery_threshold", self.requery_threshold, issues);
        if self.requery_enabled && self.requery_budget == 0 {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::RequeryWithoutBudget,
                "quality.requery_enabled is true but requery_budget is 0; no requery will run",
            ));
        }
    }
}

/// `[consensus]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConsensusConfig {
    pub outlier_threshold: f64,
    pub review_threshold: f64,
}

impl Default for FileConsensusConfig {
    fn default() -> Self {
        let params = ConsensusParams::default();
        Self {
            outlier_threshold: params.outlier_threshold,
            review_threshold: params.review_threshold,
        }
    }
}

impl FileConsensusConfig {
    pub fn to_params(&self) -> ConsensusParams {
        ConsensusParams::default()
            .with_outlier_threshold(self.outlier_threshold)
            .with_review_threshold(self.review_threshold)
    }

    pub(super) fn validate(&self, issues: &mut Vec<ConfigIssue>) {
        check_unit("consensus.outlier_threshold", self.outlier_threshold, issues);
        check_unit("consensus.review_threshold", self.review_threshold, issues);
    }
}

pub(super) fn check_unit(field: &str, value: f64, issues: &mut Vec<ConfigIssue>) {
    if !(0.0..=1.0).contains(&value) {
        issues.push(ConfigIssue::error(
            ConfigIssueCode::ThresholdOutOfRange,
            format!("{field} must be within [0, 1], got {value}"),
        ));
    }
}
