//! Report entities

use super::insights;
use crate::classification::DomainClassification;
use crate::consensus::{Aggregation, ConsensusResult, WeightBreakdown};
use crate::quality::{QualityScore, QualitySummary};
use crate::reputation::AgentPrediction;
use crate::response::{AgentResponse, ScoredResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

const QUESTION_HASH_CHARS: usize = 16;

/// Stable identifier for a forecast: question hash prefix plus timestamp.
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use foresight_domain::report::question_id;
///
/// let at = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
/// let id = question_id("Will it rain?", at);
/// assert!(id.ends_with("_20260301T120000Z"));
/// assert_eq!(id.split('_').next().unwrap().len(), 16);
/// ```
pub fn question_id(question: &str, at: DateTime<Utc>) -> String {
    let hash = blake3::hash(question.as_bytes()).to_hex();
    format!(
        "{}_{}",
        &hash.as_str()[..QUESTION_HASH_CHARS],
        at.format("%Y%m%dT%H%M%SZ")
    )
}

/// One attempt with its quality score and weight audit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseRecord {
    pub response: AgentResponse,
    pub quality: Option<QualityScore>,
    pub weight: WeightBreakdown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundTiming {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub total_elapsed_ms: u64,
    pub dispatch_elapsed_ms: u64,
    pub requery_elapsed_ms: u64,
}

/// Execution counters for one round.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundMetrics {
    /// Agents dispatched in the initial fan-out
    pub called: usize,
    /// Agents whose final attempt succeeded
    pub succeeded: usize,
    /// Agents whose final attempt failed (including declines and stragglers)
    pub failed: usize,
    pub cache_hits: usize,
    pub requeries: usize,
    /// Breaker openings observed while the round ran
    pub breaker_trips: u64,
}

impl RoundMetrics {
    /// Share of final attempts that succeeded, 1 when nothing was called.
    pub fn success_rate(&self) -> f64 {
        let total = self.succeeded + self.failed;
        if total == 0 {
            1.0
        } else {
            self.succeeded as f64 / total as f64
        }
    }
}

/// Count of final successful attempts per confidence band.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfidenceDistribution {
    /// stated confidence >= 0.7
    pub high: usize,
    /// stated confidence >= 0.4
    pub medium: usize,
    pub low: usize,
}

impl ConfidenceDistribution {
    pub fn from_confidences(values: impl IntoIterator<Item = f64>) -> Self {
        let mut dist = Self::default();
        for c in values {
            if c >= 0.7 {
                dist.high += 1;
            } else if c >= 0.4 {
                dist.medium += 1;
            } else {
                dist.low += 1;
            }
        }
        dist
    }

    pub fn total(&self) -> usize {
        self.high + self.medium + self.low
    }
}

/// Complete audit record of one forecast round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub question_id: String,
    pub question: String,
    pub classification: DomainClassification,
    /// Every attempt in dispatch order, superseded ones included
    pub responses: Vec<ResponseRecord>,
    pub consensus: ConsensusResult,
    pub quality_summary: QualitySummary,
    pub timing: RoundTiming,
    pub metrics: RoundMetrics,
    pub confidence_distribution: ConfidenceDistribution,
    pub summary: String,
    pub uncertainty_factors: Vec<String>,
    pub data_quality_score: f64,
}

impl Report {
    /// Assemble the report and derive its summary fields.
    ///
    /// `responses` and `aggregation.breakdowns` must be index-aligned, which
    /// holds for the output of [`crate::consensus::aggregate`].
    #[allow(clippy::too_many_arguments)]
    pub fn assemble(
        question_id: String,
        question: String,
        classification: DomainClassification,
        responses: Vec<ScoredResponse>,
        aggregation: Aggregation,
        quality_summary: QualitySummary,
        timing: RoundTiming,
        metrics: RoundMetrics,
    ) -> Self {
        let Aggregation {
            result: consensus,
            breakdowns,
        } = aggregation;

        let responses: Vec<ResponseRecord> = responses
            .into_iter()
            .zip(breakdowns)
            .map(|(scored, weight)| ResponseRecord {
                response: scored.response,
                quality: scored.quality,
                weight,
            })
            .collect();

        let mut report = Self {
            question_id,
            question,
            classification,
            responses,
            consensus,
            quality_summary,
            timing,
            metrics,
            confidence_distribution: ConfidenceDistribution::default(),
            summary: String::new(),
            uncertainty_factors: Vec::new(),
            data_quality_score: 0.0,
        };

        report.confidence_distribution = ConfidenceDistribution::from_confidences(
            report
                .final_successes()
                .map(|r| r.response.stated_confidence),
        );
        report.summary = insights::summarize(&report);
        report.uncertainty_factors = insights::uncertainty_factors(&report);
        report.data_quality_score = insights::data_quality_score(&report);
        report
    }

    /// Final, successful attempts (one per agent that answered).
    pub fn final_successes(&self) -> impl Iterator<Item = &ResponseRecord> {
        self.responses
            .iter()
            .filter(|r| r.response.is_final() && r.response.is_success())
    }

    /// Predictions to feed back into the reputation book once the outcome is known.
    pub fn final_predictions(&self) -> Vec<AgentPrediction> {
        self.final_successes()
            .map(|r| {
                AgentPrediction::new(
                    r.response.agent_name.clone(),
                    r.response.stated_probability,
                    r.response.stated_confidence,
                )
            })
            .collect()
    }

    /// Contributing record with the highest final weight.
    pub fn top_weighted(&self) -> Option<&ResponseRecord> {
        self.responses
            .iter()
            .filter(|r| r.weight.contributes())
            .max_by(|a, b| a.weight.final_weight.total_cmp(&b.weight.final_weight))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::agent::AgentProfile;
    use crate::consensus::{ConsensusParams, aggregate};
    use crate::quality::{DimensionScores, QualityScore};
    use crate::reputation::NeutralPerformance;
    use crate::response::{AttemptStatus, FailureKind};
    use chrono::TimeZone;

    fn quality(depth: f64) -> QualityScore {
        QualityScore {
            dimensions: DimensionScores::default(),
            penalty: 0.0,
            depth_score: depth,
            red_flags: Vec::new(),
            needs_requery: false,
            follow_up_questions: Vec::new(),
        }
    }

    pub(crate) fn sample_report() -> Report {
        let mut responses = Vec::new();
        for (name, p, c) in [("a", 0.7, 0.8), ("b", 0.72, 0.75), ("c", 0.1, 0.3)] {
            let mut r = AgentResponse::success(name, "m", 0, "text", "text", p, c, 10, false);
            r.status = AttemptStatus::Final;
            responses.push(ScoredResponse::new(r, Some(quality(0.7))));
        }
        let mut failed = AgentResponse::failure("d", "m", 0, FailureKind::Transient, "timeout");
        failed.status = AttemptStatus::Final;
        responses.push(ScoredResponse::unscored(failed));

        let profiles: Vec<_> = ["a", "b", "c", "d"]
            .iter()
            .map(|n| AgentProfile::new(*n, "p", "m", 1.0))
            .collect();
        let classification = DomainClassification::general();
        let aggregation = aggregate(
            &responses,
            &profiles,
            &classification,
            &NeutralPerformance,
            &ConsensusParams::default(),
        )
        .unwrap();

        let at = Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap();
        Report::assemble(
            question_id("q", at),
            "q".to_string(),
            classification,
            responses,
            aggregation,
            QualitySummary::default(),
            RoundTiming {
                started_at: at,
                finished_at: at,
                total_elapsed_ms: 100,
                dispatch_elapsed_ms: 80,
                requery_elapsed_ms: 20,
            },
            RoundMetrics {
                called: 4,
                succeeded: 3,
                failed: 1,
                cache_hits: 0,
                requeries: 0,
                breaker_trips: 0,
            },
        )
    }

    #[test]
    fn test_question_id_is_stable() {
        let at = Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap();
        assert_eq!(question_id("same", at), question_id("same", at));
        assert_ne!(question_id("same", at), question_id("other", at));
    }

    #[test]
    fn test_confidence_distribution_counts_final_successes() {
        let report = sample_report();
        assert_eq!(report.confidence_distribution.high, 2);
        assert_eq!(report.confidence_distribution.medium, 0);
        assert_eq!(report.confidence_distribution.low, 1);
    }

    #[test]
    fn test_final_predictions_skip_failures() {
        let report = sample_report();
        let preds = report.final_predictions();
        assert_eq!(preds.len(), 3);
        assert!(preds.iter().all(|p| p.agent != "d"));
    }

    #[test]
    fn test_records_align_with_breakdowns() {
        let report = sample_report();
        for record in &report.responses {
            assert_eq!(record.response.agent_name, record.weight.agent_name);
        }
        assert_eq!(report.top_weighted().unwrap().response.agent_name, "a");
    }

    #[test]
    fn test_success_rate() {
        assert_eq!(RoundMetrics::default().success_rate(), 1.0);
        let m = RoundMetrics {
            succeeded: 3,
            failed: 1,
            ..RoundMetrics::default()
        };
        assert_eq!(m.success_rate(), 0.75);
    }

    #[test]
    fn test_report_serializes() {
        let report = sample_report();
        let json = serde_json::to_string(&report).unwrap();
        let back: Report = serde_json::from_str(&json).unwrap();
        assert_eq!(back.question_id, report.question_id);
        assert_eq!(back.responses.len(), 4);
    }
}
