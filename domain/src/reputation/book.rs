//! Reputation book: every record plus the set of ingested questions.

use super::record::{ReputationPolicy, ReputationRecord, performance_boost};
use crate::classification::ForecastDomain;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Source of performance boosts for the consensus aggregator.
pub trait PerformanceLookup {
    /// Weight multiplier in [0.5, 1.5]; 1.0 for unknown agents.
    fn performance_boost(&self, agent: &str, domain: ForecastDomain) -> f64;
}

/// Lookup that treats every agent as having no history.
#[derive(Debug, Clone, Copy, Default)]
pub struct NeutralPerformance;

impl PerformanceLookup for NeutralPerformance {
    fn performance_boost(&self, _agent: &str, _domain: ForecastDomain) -> f64 {
        1.0
    }
}

/// One agent's final prediction for a question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentPrediction {
    pub agent: String,
    pub probability: f64,
    pub confidence: f64,
}

impl AgentPrediction {
    pub fn new(agent: impl Into<String>, probability: f64, confidence: f64) -> Self {
        Self {
            agent: agent.into(),
            probability,
            confidence,
        }
    }
}

/// Accuracy change for one agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordUpdate {
    pub agent: String,
    pub accuracy_before: f64,
    pub accuracy_after: f64,
    pub sample_size: u32,
}

/// Result of ingesting one outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutcomeApplied {
    pub question_id: String,
    pub domain: ForecastDomain,
    /// The question had already been ingested; nothing changed
    pub duplicate: bool,
    pub updates: Vec<RecordUpdate>,
}

/// All reputation records, keyed by agent then domain.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReputationBook {
    #[serde(default)]
    records: BTreeMap<String, BTreeMap<ForecastDomain, ReputationRecord>>,
    #[serde(default)]
    recorded_questions: BTreeSet<String>,
    #[serde(skip)]
    policy: ReputationPolicy,
}

impl ReputationBook {
    pub fn new(policy: ReputationPolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    pub fn with_policy(mut self, policy: ReputationPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> &ReputationPolicy {
        &self.policy
    }

    /// Fold a verified outcome into every participating agent's record.
    ///
    /// Unknown agent/domain pairs start at the neutral prior. Ingesting the
    /// same `question_id` twice changes nothing.
    pub fn record_outcome(
        &mut self,
        question_id: &str,
        domain: ForecastDomain,
        predictions: &[AgentPrediction],
        occurred: bool,
        now: DateTime<Utc>,
    ) -> OutcomeApplied {
        if self.recorded_questions.contains(question_id) {
            return OutcomeApplied {
                question_id: question_id.to_string(),
                domain,
                duplicate: true,
                updates: Vec::new(),
            };
        }

        let policy = self.policy;
        let mut updates = Vec::with_capacity(predictions.len());
        for prediction in predictions {
            let record = self
                .records
                .entry(prediction.agent.clone())
                .or_default()
                .entry(domain)
                .or_insert_with(|| ReputationRecord::neutral(&prediction.agent, domain));
            let before = record.accuracy;
            record.apply(
                prediction.probability,
                prediction.confidence,
                occurred,
                now,
                &policy,
            );
            updates.push(RecordUpdate {
                agent: prediction.agent.clone(),
                accuracy_before: before,
                accuracy_after: record.accuracy,
                sample_size: record.sample_size,
            });
        }
        self.recorded_questions.insert(question_id.to_string());

        OutcomeApplied {
            question_id: question_id.to_string(),
            domain,
            duplicate: false,
            updates,
        }
    }

    pub fn get(&self, agent: &str, domain: ForecastDomain) -> Option<&ReputationRecord> {
        self.records.get(agent).and_then(|d| d.get(&domain))
    }

    /// Every domain record for `agent`, in domain priority order.
    pub fn overview(&self, agent: &str) -> Vec<&ReputationRecord> {
        self.records
            .get(agent)
            .map(|d| d.values().collect())
            .unwrap_or_default()
    }

    pub fn has_recorded(&self, question_id: &str) -> bool {
        self.recorded_questions.contains(question_id)
    }

    pub fn agents(&self) -> impl Iterator<Item = &str> {
        self.records.keys().map(String::as_str)
    }

    pub fn record_count(&self) -> usize {
        self.records.values().map(BTreeMap::len).sum()
    }
}

impl PerformanceLookup for ReputationBook {
    fn performance_boost(&self, agent: &str, domain: ForecastDomain) -> f64 {
        self.get(agent, domain)
            .map(ReputationRecord::performance_boost)
            .unwrap_or_else(|| performance_boost(super::record::NEUTRAL_ACCURACY))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2025-03-01T00:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn test_unknown_agent_is_neutral() {
        let book = ReputationBook::default();
        assert_eq!(book.performance_boost("nobody", ForecastDomain::Military), 1.0);
    }

    #[test]
    fn test_record_outcome_creates_records() {
        let mut book = ReputationBook::default();
        let applied = book.record_outcome(
            "q1",
            ForecastDomain::Military,
            &[
                AgentPrediction::new("a", 0.9, 0.8),
                AgentPrediction::new("b", 0.1, 0.6),
            ],
            true,
            now(),
        );
        assert!(!applied.duplicate);
        assert_eq!(applied.updates.len(), 2);
        assert_eq!(applied.updates[0].accuracy_before, 0.5);
        assert!(
            book.performance_boost("a", ForecastDomain::Military)
                > book.performance_boost("b", ForecastDomain::Military)
        );
        assert!(book.get("a", ForecastDomain::Energy).is_none());
        assert_eq!(book.record_count(), 2);
    }

    #[test]
    fn test_duplicate_question_is_noop() {
        let mut book = ReputationBook::default();
        let preds = [AgentPrediction::new("a", 0.9, 0.8)];
        book.record_outcome("q1", ForecastDomain::Military, &preds, true, now());
        let snapshot = book.clone();
        let applied = book.record_outcome("q1", ForecastDomain::Military, &preds, false, now());
        assert!(applied.duplicate);
        assert!(applied.updates.is_empty());
        assert_eq!(book, snapshot);
    }

    #[test]
    fn test_overview_lists_domains() {
        let mut book = ReputationBook::default();
        let preds = [AgentPrediction::new("a", 0.7, 0.7)];
        book.record_outcome("q1", ForecastDomain::Energy, &preds, true, now());
        book.record_outcome("q2", ForecastDomain::Military, &preds, false, now());
        let domains: Vec<_> = book.overview("a").iter().map(|r| r.domain).collect();
        assert_eq!(domains, vec![ForecastDomain::Military, ForecastDomain::Energy]);
        assert!(book.overview("zzz").is_empty());
    }

    #[test]
    fn test_serde_roundtrip_keeps_window() {
        let mut book = ReputationBook::default();
        book.record_outcome(
            "q1",
            ForecastDomain::Financial,
            &[AgentPrediction::new("a", 0.3, 0.4)],
            false,
            now(),
        );
        let json = serde_json::to_string(&book).unwrap();
        let restored: ReputationBook = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, book);
        assert!(restored.has_recorded("q1"));
    }
}
