//! Round-level quality summary

use super::score::QualityScore;
use serde::{Deserialize, Serialize};

const WEAKEST_LISTED: usize = 3;

/// Aggregate view of the final attempts' quality in one round.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QualitySummary {
    pub scored_responses: usize,
    pub average_depth: f64,
    pub min_depth: f64,
    pub max_depth: f64,
    pub requery_count: usize,
    /// Final attempts that still carried at least one red flag
    pub flagged_responses: usize,
    /// Agents whose final depth stayed below the threshold, weakest first
    pub weakest_agents: Vec<String>,
}

impl QualitySummary {
    /// Build from `(agent_name, score)` pairs of final attempts.
    pub fn from_final_scores<'a>(
        scores: impl IntoIterator<Item = (&'a str, &'a QualityScore)>,
        requery_count: usize,
        threshold: f64,
    ) -> Self {
        let scores: Vec<_> = scores.into_iter().collect();
        if scores.is_empty() {
            return Self {
                requery_count,
                ..Self::default()
            };
        }

        let depths: Vec<f64> = scores.iter().map(|(_, s)| s.depth_score).collect();
        let total: f64 = depths.iter().sum();
        let min = depths.iter().copied().fold(f64::INFINITY, f64::min);
        let max = depths.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        let mut below: Vec<_> = scores
            .iter()
            .filter(|(_, s)| s.depth_score < threshold)
            .collect();
        below.sort_by(|a, b| a.1.depth_score.total_cmp(&b.1.depth_score));

        Self {
            scored_responses: scores.len(),
            average_depth: total / scores.len() as f64,
            min_depth: min,
            max_depth: max,
            requery_count,
            flagged_responses: scores.iter().filter(|(_, s)| s.has_flags()).count(),
            weakest_agents: below
                .into_iter()
                .take(WEAKEST_LISTED)
                .map(|(name, _)| name.to_string())
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quality::score::{DimensionScores, RedFlag};

    fn score(depth: f64, flags: Vec<RedFlag>) -> QualityScore {
        QualityScore {
            dimensions: DimensionScores::default(),
            penalty: 0.0,
            depth_score: depth,
            red_flags: flags,
            needs_requery: false,
            follow_up_questions: Vec::new(),
        }
    }

    #[test]
    fn test_summary_statistics() {
        let a = score(0.8, vec![]);
        let b = score(0.3, vec![RedFlag::TooShort]);
        let c = score(0.5, vec![]);
        let summary =
            QualitySummary::from_final_scores([("a", &a), ("b", &b), ("c", &c)], 2, 0.6);
        assert_eq!(summary.scored_responses, 3);
        assert!((summary.average_depth - 1.6 / 3.0).abs() < 1e-12);
        assert_eq!(summary.min_depth, 0.3);
        assert_eq!(summary.max_depth, 0.8);
        assert_eq!(summary.requery_count, 2);
        assert_eq!(summary.flagged_responses, 1);
        assert_eq!(summary.weakest_agents, vec!["b", "c"]);
    }

    #[test]
    fn test_empty_summary() {
        let summary = QualitySummary::from_final_scores(std::iter::empty(), 0, 0.6);
        assert_eq!(summary.scored_responses, 0);
        assert_eq!(summary.average_depth, 0.0);
    }
}
