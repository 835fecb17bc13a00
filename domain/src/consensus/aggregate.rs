//! Consensus aggregation

use super::weights::{ExclusionReason, WeightBreakdown, relevance_boost};
use crate::agent::AgentProfile;
use crate::classification::DomainClassification;
use crate::core::error::DomainError;
use crate::reputation::PerformanceLookup;
use crate::response::{AttemptStatus, ScoredResponse};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Outlier and review thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConsensusParams {
    /// Absolute deviation from the weighted probability that marks an outlier
    pub outlier_threshold: f64,
    /// Dissent share above which the result requires review
    pub review_threshold: f64,
}

impl Default for ConsensusParams {
    fn default() -> Self {
        Self {
            outlier_threshold: 0.2,
            review_threshold: 0.4,
        }
    }
}

impl ConsensusParams {
    pub fn with_outlier_threshold(mut self, threshold: f64) -> Self {
        self.outlier_threshold = threshold;
        self
    }

    pub fn with_review_threshold(mut self, threshold: f64) -> Self {
        self.review_threshold = threshold;
        self
    }
}

/// Agreement band from the weighted standard deviation of probabilities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgreementLevel {
    Unanimous,
    Strong,
    Moderate,
    Weak,
    Divergent,
}

impl AgreementLevel {
    pub fn from_spread(spread: f64) -> Self {
        if spread < 0.05 {
            AgreementLevel::Unanimous
        } else if spread < 0.15 {
            AgreementLevel::Strong
        } else if spread < 0.30 {
            AgreementLevel::Moderate
        } else if spread < 0.50 {
            AgreementLevel::Weak
        } else {
            AgreementLevel::Divergent
        }
    }
}

impl fmt::Display for AgreementLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AgreementLevel::Unanimous => "unanimous",
            AgreementLevel::Strong => "strong",
            AgreementLevel::Moderate => "moderate",
            AgreementLevel::Weak => "weak",
            AgreementLevel::Divergent => "divergent",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsensusResult {
    pub weighted_probability: f64,
    pub weighted_confidence: f64,
    pub agreement_level: AgreementLevel,
    /// Weighted standard deviation of stated probabilities
    pub weighted_spread: f64,
    pub outlier_agents: Vec<String>,
    pub dissent_percentage: f64,
    pub requires_review: bool,
    pub contributing_agents: usize,
    pub total_weight: f64,
    /// Every accepted answer scored zero depth, so [`ACCEPTED_DEPTH_FLOOR`]
    /// stood in for the depth factor
    #[serde(default)]
    pub depth_floor_applied: bool,
}

impl ConsensusResult {
    /// 1 for perfect agreement, 0 at maximal spread.
    pub fn agreement_strength(&self) -> f64 {
        (1.0 - 2.0 * self.weighted_spread).clamp(0.0, 1.0)
    }
}

/// Consensus plus the per-response weight audit, in input order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Aggregation {
    pub result: ConsensusResult,
    pub breakdowns: Vec<WeightBreakdown>,
}

/// Depth used for accepted answers when every one of them scored zero.
pub const ACCEPTED_DEPTH_FLOOR: f64 = 0.05;

/// Combine scored responses into a consensus.
///
/// Pure and deterministic: sums run in input order, so the same input
/// always yields a bit-identical result. When the only thing keeping every
/// final success out is a zero depth score, the depth factor is floored at
/// [`ACCEPTED_DEPTH_FLOOR`] so shallow answers lose weight without being
/// rejected. Fails only when no response can carry a positive weight.
pub fn aggregate(
    responses: &[ScoredResponse],
    profiles: &[AgentProfile],
    classification: &DomainClassification,
    reputation: &dyn PerformanceLookup,
    params: &ConsensusParams,
) -> Result<Aggregation, DomainError> {
    let weigh_all = |depth_floor: f64| -> Vec<WeightBreakdown> {
        responses
            .iter()
            .map(|scored| weigh(scored, profiles, classification, reputation, depth_floor))
            .collect()
    };
    let mut breakdowns = weigh_all(0.0);
    let mut depth_floor_applied = false;
    let only_depth_missing = !breakdowns.iter().any(WeightBreakdown::contributes)
        && breakdowns
            .iter()
            .any(|b| b.excluded == Some(ExclusionReason::ZeroDepth));
    if only_depth_missing {
        breakdowns = weigh_all(ACCEPTED_DEPTH_FLOOR);
        depth_floor_applied = true;
    }

    let contributing: Vec<(&ScoredResponse, f64)> = responses
        .iter()
        .zip(&breakdowns)
        .filter(|(_, b)| b.contributes())
        .map(|(r, b)| (r, b.final_weight))
        .collect();

    let total_weight: f64 = contributing.iter().map(|(_, w)| w).sum();
    if contributing.is_empty() || total_weight <= 0.0 {
        return Err(DomainError::NoWeightedResponses);
    }

    let weighted_mean = |value: fn(&ScoredResponse) -> f64| {
        contributing.iter().map(|(r, w)| w * value(r)).sum::<f64>() / total_weight
    };
    let weighted_probability = weighted_mean(|r| r.response.stated_probability);
    let weighted_confidence = weighted_mean(|r| r.response.stated_confidence);

    let variance = contributing
        .iter()
        .map(|(r, w)| w * (r.response.stated_probability - weighted_probability).powi(2))
        .sum::<f64>()
        / total_weight;
    let weighted_spread = variance.sqrt();

    let mut outlier_agents = Vec::new();
    let mut outlier_weight = 0.0;
    for (r, w) in &contributing {
        let deviation = (r.response.stated_probability - weighted_probability).abs();
        if deviation > params.outlier_threshold {
            outlier_weight += w;
            if !outlier_agents.contains(&r.response.agent_name) {
                outlier_agents.push(r.response.agent_name.clone());
            }
        }
    }
    let dissent_percentage = (outlier_weight / total_weight).clamp(0.0, 1.0);

    let result = ConsensusResult {
        weighted_probability: weighted_probability.clamp(0.0, 1.0),
        weighted_confidence: weighted_confidence.clamp(0.0, 1.0),
        agreement_level: AgreementLevel::from_spread(weighted_spread),
        weighted_spread,
        outlier_agents,
        dissent_percentage,
        requires_review: dissent_percentage > params.review_threshold,
        contributing_agents: contributing.len(),
        total_weight,
        depth_floor_applied,
    };

    Ok(Aggregation { result, breakdowns })
}

fn weigh(
    scored: &ScoredResponse,
    profiles: &[AgentProfile],
    classification: &DomainClassification,
    reputation: &dyn PerformanceLookup,
    depth_floor: f64,
) -> WeightBreakdown {
    let response = &scored.response;
    let profile = profiles.iter().find(|p| p.name == response.agent_name);

    let base_weight = profile.map_or(0.0, |p| p.base_weight.max(0.0));
    let relevance = profile.map_or(0.0, |p| relevance_boost(p, classification));
    let performance = reputation
        .performance_boost(&response.agent_name, classification.primary_domain)
        .max(0.0);
    let depth = scored.depth_score().max(depth_floor);

    let excluded = if profile.is_none() {
        Some(ExclusionReason::UnknownAgent)
    } else if response.is_failed() {
        Some(ExclusionReason::Failed)
    } else if response.status == AttemptStatus::Superseded {
        Some(ExclusionReason::Superseded)
    } else if depth <= 0.0 {
        Some(ExclusionReason::ZeroDepth)
    } else if response.stated_confidence <= 0.0 {
        Some(ExclusionReason::ZeroConfidence)
    } else {
        None
    };

    let final_weight = if excluded.is_some() {
        0.0
    } else {
        base_weight * relevance * performance * response.stated_confidence * depth
    };

    WeightBreakdown {
        agent_name: response.agent_name.clone(),
        attempt_index: response.attempt_index,
        base_weight,
        relevance_boost: relevance,
        performance_boost: performance,
        stated_confidence: response.stated_confidence,
        depth_score: depth,
        final_weight,
        excluded,
    }
}
