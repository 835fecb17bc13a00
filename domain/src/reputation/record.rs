//! Reputation record entity

use crate::classification::ForecastDomain;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Neutral prior accuracy.
pub const NEUTRAL_ACCURACY: f64 = 0.5;

const LIFETIME_SHARE: f64 = 0.5;
const RECENT_SHARE: f64 = 0.3;
const CALIBRATION_SHARE: f64 = 0.2;

/// Window and shrinkage parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReputationPolicy {
    /// Number of most recent samples kept for the recent average
    pub recent_window: usize,
    /// Sample size below which accuracy is shrunk towards the prior
    pub shrinkage_floor: u32,
}

impl Default for ReputationPolicy {
    fn default() -> Self {
        Self {
            recent_window: 30,
            shrinkage_floor: 10,
        }
    }
}

/// Map accuracy in [0, 1] to a weight multiplier in [0.5, 1.5].
pub fn performance_boost(accuracy: f64) -> f64 {
    (0.5 + accuracy).clamp(0.5, 1.5)
}

/// One verified prediction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OutcomeSample {
    pub accuracy_component: f64,
    pub predicted_confidence: f64,
}

/// Historical accuracy of one agent in one domain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReputationRecord {
    pub agent: String,
    pub domain: ForecastDomain,
    /// Combined, shrunk accuracy in [0, 1]
    pub accuracy: f64,
    pub sample_size: u32,
    pub lifetime_accuracy_sum: f64,
    pub recent: VecDeque<OutcomeSample>,
    pub calibration: f64,
    pub last_updated: Option<DateTime<Utc>>,
}

impl ReputationRecord {
    /// A record with no history, sitting at the neutral prior.
    pub fn neutral(agent: impl Into<String>, domain: ForecastDomain) -> Self {
        Self {
            agent: agent.into(),
            domain,
            accuracy: NEUTRAL_ACCURACY,
            sample_size: 0,
            lifetime_accuracy_sum: 0.0,
            recent: VecDeque::new(),
            calibration: 0.0,
            last_updated: None,
        }
    }

    pub fn lifetime_accuracy(&self) -> f64 {
        if self.sample_size == 0 {
            NEUTRAL_ACCURACY
        } else {
            self.lifetime_accuracy_sum / f64::from(self.sample_size)
        }
    }

    pub fn recent_accuracy(&self) -> f64 {
        if self.recent.is_empty() {
            NEUTRAL_ACCURACY
        } else {
            self.recent.iter().map(|s| s.accuracy_component).sum::<f64>() / self.recent.len() as f64
        }
    }

    pub fn performance_boost(&self) -> f64 {
        performance_boost(self.accuracy)
    }

    /// Fold one verified prediction into the record.
    pub fn apply(
        &mut self,
        predicted_probability: f64,
        predicted_confidence: f64,
        occurred: bool,
        now: DateTime<Utc>,
        policy: &ReputationPolicy,
    ) {
        let p = unit_or_neutral(predicted_probability);
        let outcome = if occurred { 1.0 } else { 0.0 };
        let component = 1.0 - (p - outcome).powi(2);

        self.lifetime_accuracy_sum += component;
        self.sample_size += 1;
        self.recent.push_back(OutcomeSample {
            accuracy_component: component,
            predicted_confidence: unit_or_neutral(predicted_confidence),
        });
        while self.recent.len() > policy.recent_window.max(1) {
            self.recent.pop_front();
        }

        let recent = self.recent_accuracy();
        self.calibration = self
            .recent
            .iter()
            .map(|s| 1.0 - (s.predicted_confidence - recent).abs())
            .sum::<f64>()
            / self.recent.len() as f64;

        let combined = LIFETIME_SHARE * self.lifetime_accuracy()
            + RECENT_SHARE * recent
            + CALIBRATION_SHARE * self.calibration;

        self.accuracy = shrink(combined, self.sample_size, policy.shrinkage_floor).clamp(0.0, 1.0);
        self.last_updated = Some(now);
    }
}

fn shrink(accuracy: f64, sample_size: u32, floor: u32) -> f64 {
    if floor == 0 || sample_size >= floor {
        return accuracy;
    }
    let share = f64::from(sample_size) / f64::from(floor);
    accuracy * share + NEUTRAL_ACCURACY * (1.0 - share)
}

fn unit_or_neutral(v: f64) -> f64 {
    if v.is_nan() { NEUTRAL_ACCURACY } else { v.clamp(0.0, 1.0) }
}
