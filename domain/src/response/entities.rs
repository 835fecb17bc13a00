//! Agent response entity

use crate::quality::QualityScore;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle of one attempt: `Initial -> Superseded` or `Initial -> Final`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttemptStatus {
    /// Produced and not yet settled by the quality review
    Initial,
    /// Replaced by a later or better attempt for the same agent
    Superseded,
    /// The attempt that represents the agent in aggregation
    Final,
}

/// Why an attempt produced no usable opinion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Transient backend error after retries were exhausted
    Transient,
    /// Permanent backend error (no retry)
    Permanent,
    /// Breaker was open for the endpoint
    CircuitOpen,
    /// Still outstanding when the round deadline fired
    DeadlineExceeded,
    /// Reply contained no probability
    Unparseable,
    /// Agent explicitly declined to answer
    Declined,
    /// Round was cancelled while the call was in flight
    Cancelled,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FailureKind::Transient => "transient",
            FailureKind::Permanent => "permanent",
            FailureKind::CircuitOpen => "circuit_open",
            FailureKind::DeadlineExceeded => "deadline_exceeded",
            FailureKind::Unparseable => "unparseable_probability",
            FailureKind::Declined => "declined",
            FailureKind::Cancelled => "cancelled",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseFailure {
    pub kind: FailureKind,
    pub reason: String,
}

impl fmt::Display for ResponseFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.reason)
    }
}

/// One attempt by one agent (append-only audit record).
///
/// Failed attempts carry `stated_probability` and `stated_confidence` of 0
/// and never contribute to aggregation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentResponse {
    pub agent_name: String,
    pub model: String,
    /// 0 for the initial dispatch, incremented per requery
    pub attempt_index: u32,
    pub raw_text: String,
    /// Text scored by the quality assessor (`analysis` field when present)
    pub analysis: String,
    pub stated_probability: f64,
    pub stated_confidence: f64,
    pub recommendation: Option<String>,
    pub elapsed_ms: u64,
    pub cache_hit: bool,
    pub failure: Option<ResponseFailure>,
    pub status: AttemptStatus,
}

impl AgentResponse {
    /// Create a successful attempt. Probability and confidence are clamped.
    #[allow(clippy::too_many_arguments)]
    pub fn success(
        agent_name: impl Into<String>,
        model: impl Into<String>,
        attempt_index: u32,
        raw_text: impl Into<String>,
        analysis: impl Into<String>,
        stated_probability: f64,
        stated_confidence: f64,
        elapsed_ms: u64,
        cache_hit: bool,
    ) -> Self {
        Self {
            agent_name: agent_name.into(),
            model: model.into(),
            attempt_index,
            raw_text: raw_text.into(),
            analysis: analysis.into(),
            stated_probability: clamp_unit(stated_probability),
            stated_confidence: clamp_unit(stated_confidence),
            recommendation: None,
            elapsed_ms,
            cache_hit,
            failure: None,
            status: AttemptStatus::Initial,
        }
    }

    /// Create a failed attempt.
    pub fn failure(
        agent_name: impl Into<String>,
        model: impl Into<String>,
        attempt_index: u32,
        kind: FailureKind,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            agent_name: agent_name.into(),
            model: model.into(),
            attempt_index,
            raw_text: String::new(),
            analysis: String::new(),
            stated_probability: 0.0,
            stated_confidence: 0.0,
            recommendation: None,
            elapsed_ms: 0,
            cache_hit: false,
            failure: Some(ResponseFailure {
                kind,
                reason: reason.into(),
            }),
            status: AttemptStatus::Initial,
        }
    }

    pub fn with_recommendation(mut self, recommendation: Option<String>) -> Self {
        self.recommendation = recommendation;
        self
    }

    pub fn with_raw_text(mut self, raw_text: impl Into<String>) -> Self {
        self.raw_text = raw_text.into();
        self
    }

    pub fn with_timing(mut self, elapsed_ms: u64, cache_hit: bool) -> Self {
        self.elapsed_ms = elapsed_ms;
        self.cache_hit = cache_hit;
        self
    }

    pub fn is_failed(&self) -> bool {
        self.failure.is_some()
    }

    pub fn is_success(&self) -> bool {
        self.failure.is_none()
    }

    pub fn is_declined(&self) -> bool {
        matches!(
            self.failure,
            Some(ResponseFailure {
                kind: FailureKind::Declined,
                ..
            })
        )
    }

    pub fn is_final(&self) -> bool {
        self.status == AttemptStatus::Final
    }

    pub fn is_superseded(&self) -> bool {
        self.status == AttemptStatus::Superseded
    }

    pub fn failure_reason(&self) -> Option<String> {
        self.failure.as_ref().map(ToString::to_string)
    }
}

/// A response paired with its quality assessment (`None` for failures).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredResponse {
    pub response: AgentResponse,
    pub quality: Option<QualityScore>,
}

impl ScoredResponse {
    pub fn new(response: AgentResponse, quality: Option<QualityScore>) -> Self {
        Self { response, quality }
    }

    pub fn unscored(response: AgentResponse) -> Self {
        Self {
            response,
            quality: None,
        }
    }

    /// Depth score, 0 when unscored.
    pub fn depth_score(&self) -> f64 {
        self.quality.as_ref().map_or(0.0, |q| q.depth_score)
    }

    pub fn needs_requery(&self) -> bool {
        self.quality.as_ref().is_some_and(|q| q.needs_requery)
    }
}

fn clamp_unit(v: f64) -> f64 {
    if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) }
}
