//! Round parameters: per-round loop control.

use foresight_domain::core::question::DEFAULT_MAX_QUESTION_CHARS;
use foresight_domain::{ConsensusParams, ContextQuery, QualityPolicy};
use std::time::Duration;

/// Timeouts and input bounds for one round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundParams {
    /// Timeout for each gateway attempt.
    pub call_timeout: Duration,
    /// Cap on the total wait of one dispatch pass.
    pub round_deadline: Duration,
    pub max_question_chars: usize,
}

impl Default for RoundParams {
    fn default() -> Self {
        Self {
            call_timeout: Duration::from_secs(60),
            round_deadline: Duration::from_secs(180),
            max_question_chars: DEFAULT_MAX_QUESTION_CHARS,
        }
    }
}

impl RoundParams {
    pub fn with_call_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout = timeout;
        self
    }

    pub fn with_round_deadline(mut self, deadline: Duration) -> Self {
        self.round_deadline = deadline;
        self
    }

    pub fn with_max_question_chars(mut self, max: usize) -> Self {
        self.max_question_chars = max;
        self
    }
}

/// Requery policy.
#[derive(Debug, Clone, PartialEq)]
pub struct QualityParams {
    pub policy: QualityPolicy,
    /// Requery passes allowed per agent.
    pub requery_budget: u32,
    pub requery_enabled: bool,
}

impl Default for QualityParams {
    fn default() -> Self {
        Self {
            policy: QualityPolicy::default(),
            requery_budget: 1,
            requery_enabled: true,
        }
    }
}

impl QualityParams {
    pub fn with_policy(mut self, policy: QualityPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_requery_budget(mut self, budget: u32) -> Self {
        self.requery_budget = budget;
        self
    }

    pub fn without_requery(mut self) -> Self {
        self.requery_enabled = false;
        self
    }

    /// Requery passes that will actually run.
    pub fn effective_budget(&self) -> u32 {
        if self.requery_enabled {
            self.requery_budget
        } else {
            0
        }
    }
}

/// Everything [`RunForecastUseCase`](crate::use_cases::run_forecast::RunForecastUseCase)
/// needs besides its ports.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ForecastParams {
    pub round: RoundParams,
    pub quality: QualityParams,
    pub consensus: ConsensusParams,
    pub context: ContextQuery,
}

impl ForecastParams {
    pub fn with_round(mut self, round: RoundParams) -> Self {
        self.round = round;
        self
    }

    pub fn with_quality(mut self, quality: QualityParams) -> Self {
        self.quality = quality;
        self
    }

    pub fn with_consensus(mut self, consensus: ConsensusParams) -> Self {
        self.consensus = consensus;
        self
    }

    pub fn with_context(mut self, context: ContextQuery) -> Self {
        self.context = context;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_defaults() {
        let params = RoundParams::default();
        assert_eq!(params.call_timeout, Duration::from_secs(60));
        assert_eq!(params.max_question_chars, 2000);
    }

    #[test]
    fn test_disabled_requery_has_no_budget() {
        let quality = QualityParams::default().with_requery_budget(2);
        assert_eq!(quality.effective_budget(), 2);
        assert_eq!(quality.without_requery().effective_budget(), 0);
    }
}
