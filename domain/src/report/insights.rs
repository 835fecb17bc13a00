//! Deterministic narrative fields derived from a report.

use super::entities::Report;

const HIGH_CONFIDENCE_MAJORITY: f64 = 0.6;
const LOW_CONFIDENCE_MINORITY: f64 = 0.3;
const WEAK_CONSENSUS: f64 = 0.5;
const MANY_OUTLIERS: usize = 2;
const LOW_CONFIDENCE_SHARE: f64 = 0.4;

fn percent(v: f64) -> String {
    format!("{:.0}%", v * 100.0)
}

pub(super) fn summarize(report: &Report) -> String {
    let answered = report.confidence_distribution.total();
    let mut parts = vec![
        format!(
            "Analysis of {} question with {} classification confidence.",
            report.classification.primary_domain,
            percent(report.classification.confidence)
        ),
        format!(
            "Consensus probability {} shows {} agreement (strength: {}) across {} expert agents.",
            percent(report.consensus.weighted_probability),
            report.consensus.agreement_level,
            percent(report.consensus.agreement_strength()),
            answered
        ),
    ];

    if let Some(top) = report.top_weighted() {
        parts.push(format!(
            "Analysis led by {} with the highest weight.",
            top.response.agent_name
        ));
    }

    let high = report.confidence_distribution.high as f64;
    if answered > 0 {
        if high >= answered as f64 * HIGH_CONFIDENCE_MAJORITY {
            parts.push("High confidence across majority of agents.".to_string());
        } else if high < answered as f64 * LOW_CONFIDENCE_MINORITY {
            parts.push("Low confidence indicates high uncertainty.".to_string());
        }
    }

    if report.consensus.requires_review {
        parts.push(format!(
            "Flagged for review: {} of the weight dissents.",
            percent(report.consensus.dissent_percentage)
        ));
    }

    parts.join(" ")
}

pub(super) fn uncertainty_factors(report: &Report) -> Vec<String> {
    let mut factors = Vec::new();
    let strength = report.consensus.agreement_strength();
    if strength < WEAK_CONSENSUS {
        factors.push(format!(
            "Low consensus ({}) indicates divergent expert opinions",
            percent(strength)
        ));
    }

    let outliers = report.consensus.outlier_agents.len();
    if outliers > MANY_OUTLIERS {
        factors.push(format!(
            "{outliers} agents provided significantly divergent analysis"
        ));
    }

    let answered = report.confidence_distribution.total();
    let low = report.confidence_distribution.low;
    if answered > 0 && low as f64 > answered as f64 * LOW_CONFIDENCE_SHARE {
        factors.push(format!("{low}/{answered} agents expressed low confidence"));
    }

    if report.metrics.failed > 0 {
        factors.push(format!(
            "{} agent(s) failed to respond - reduced analysis coverage",
            report.metrics.failed
        ));
    }

    if report.metrics.breaker_trips > 0 {
        factors.push("Service instability detected - some analysis may be incomplete".to_string());
    }

    if report.consensus.depth_floor_applied {
        factors.push("Every answer lacked analytical depth - consensus rests on floor weights".to_string());
    }

    if !report.quality_summary.weakest_agents.is_empty() {
        factors.push(format!(
            "Shallow analysis from {} after requery",
            report.quality_summary.weakest_agents.join(", ")
        ));
    }

    factors
}

/// 0.3 agreement strength + 0.25 high-confidence share + 0.25 success rate
/// + 0.2 share of agents with an above-neutral performance boost.
pub(super) fn data_quality_score(report: &Report) -> f64 {
    let answered = report.confidence_distribution.total();
    let (high_share, performer_share) = if answered == 0 {
        (0.0, 0.0)
    } else {
        let performers = report
            .final_successes()
            .filter(|r| r.weight.performance_boost > 1.0)
            .count();
        (
            report.confidence_distribution.high as f64 / answered as f64,
            performers as f64 / answered as f64,
        )
    };

    let score = 0.3 * report.consensus.agreement_strength()
        + 0.25 * high_share
        + 0.25 * report.metrics.success_rate()
        + 0.2 * performer_share;
    score.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::super::entities::tests::sample_report;
    use super::*;

    #[test]
    fn test_summary_mentions_domain_and_leader() {
        let report = sample_report();
        assert!(report.summary.starts_with("Analysis of general question"));
        assert!(report.summary.contains("led by a"));
        assert!(report.summary.contains("across 3 expert agents"));
    }

    #[test]
    fn test_failed_agent_is_an_uncertainty_factor() {
        let report = sample_report();
        assert!(
            report
                .uncertainty_factors
                .iter()
                .any(|f| f.starts_with("1 agent(s) failed"))
        );
    }

    #[test]
    fn test_data_quality_formula() {
        let report = sample_report();
        let expected = 0.3 * report.consensus.agreement_strength() + 0.25 * (2.0 / 3.0) + 0.25 * 0.75;
        assert!((data_quality_score(&report) - expected).abs() < 1e-12);
        assert!((report.data_quality_score - expected).abs() < 1e-12);
    }

    #[test]
    fn test_summary_is_deterministic() {
        assert_eq!(summarize(&sample_report()), summarize(&sample_report()));
    }
}
