//! Per-response weight computation

use crate::agent::{AgentProfile, DomainAffinity};
use crate::classification::DomainClassification;
use serde::{Deserialize, Serialize};

pub const PRIMARY_MATCH_BOOST: f64 = 1.5;
pub const SECONDARY_MATCH_BOOST: f64 = 1.2;
pub const NO_MATCH_BOOST: f64 = 0.6;

/// Relevance multiplier from the agent's domain affinities.
///
/// - 1.5 when the agent is primary in the question's primary domain
/// - 1.2 when the agent is secondary in the question's primary domain, or
///   has any affinity for one of the question's secondary domains
/// - 0.6 otherwise (including every agent for `general` questions)
pub fn relevance_boost(profile: &AgentProfile, classification: &DomainClassification) -> f64 {
    if classification.is_general() {
        return NO_MATCH_BOOST;
    }
    match profile.affinity_for(classification.primary_domain) {
        DomainAffinity::Primary => PRIMARY_MATCH_BOOST,
        DomainAffinity::Secondary => SECONDARY_MATCH_BOOST,
        DomainAffinity::None => {
            let secondary_match = classification
                .secondary_domains
                .iter()
                .any(|d| profile.affinity_for(*d) != DomainAffinity::None);
            if secondary_match {
                SECONDARY_MATCH_BOOST
            } else {
                NO_MATCH_BOOST
            }
        }
    }
}

/// Why a response carries no weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExclusionReason {
    Failed,
    Superseded,
    ZeroDepth,
    ZeroConfidence,
    UnknownAgent,
}

/// Audit trail of how one response was weighted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightBreakdown {
    pub agent_name: String,
    pub attempt_index: u32,
    pub base_weight: f64,
    pub relevance_boost: f64,
    pub performance_boost: f64,
    pub stated_confidence: f64,
    pub depth_score: f64,
    pub final_weight: f64,
    pub excluded: Option<ExclusionReason>,
}

impl WeightBreakdown {
    pub fn contributes(&self) -> bool {
        self.excluded.is_none() && self.final_weight > 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classification::{ForecastDomain, classify};

    fn military_expert() -> AgentProfile {
        AgentProfile::new("m", "p", "x", 1.0)
            .with_affinity(ForecastDomain::Military, DomainAffinity::Primary)
    }

    #[test]
    fn test_military_scenario_boosts() {
        let c = classify("Will there be a military escalation in region X within 30 days?");
        assert_eq!(relevance_boost(&military_expert(), &c), 1.5);
        let unaffiliated = AgentProfile::new("u", "p", "x", 1.0);
        assert_eq!(relevance_boost(&unaffiliated, &c), 0.6);
    }

    #[test]
    fn test_secondary_affinity_on_primary_domain() {
        let c = classify("Will there be a military escalation?");
        let p = AgentProfile::new("s", "p", "x", 1.0)
            .with_affinity(ForecastDomain::Military, DomainAffinity::Secondary);
        assert_eq!(relevance_boost(&p, &c), 1.2);
    }

    #[test]
    fn test_affinity_for_secondary_domain() {
        // military primary, energy secondary
        let c = classify("Will the army seize the oil fields?");
        let p = AgentProfile::new("e", "p", "x", 1.0)
            .with_affinity(ForecastDomain::Energy, DomainAffinity::Primary);
        assert_eq!(relevance_boost(&p, &c), 1.2);
    }

    #[test]
    fn test_general_question_uniform() {
        let c = classify("Will my cat learn to open doors?");
        assert_eq!(relevance_boost(&military_expert(), &c), 0.6);
        assert_eq!(relevance_boost(&AgentProfile::new("u", "p", "x", 1.0), &c), 0.6);
    }
}
