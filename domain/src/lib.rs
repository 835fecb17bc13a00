//! Domain layer for foresight
//!
//! This crate contains the core forecasting logic, entities, and value
//! objects. It performs no I/O and has no async runtime: everything here is
//! a pure function or a plain state machine driven by the application layer.
//!
//! # Core Concepts
//!
//! ## Round
//!
//! One question is classified into domains, sent to every enabled agent,
//! scored for analytical depth, optionally re-queried, then aggregated:
//!
//! ```text
//! question ─▶ classify ─▶ agents ─▶ parse ─▶ quality ─▶ (requery) ─▶ aggregate ─▶ Report
//!                                                  ▲
//!                                   reputation ────┘ (performance boost)
//! ```
//!
//! ## Weighting
//!
//! `final_weight = base_weight × relevance × performance × confidence × depth`.
//! Boosts compose multiplicatively and every factor is non-negative.
//!
//! ## Resilience
//!
//! [`CircuitBreaker`] and [`ResponseCache`] are explicit state objects; the
//! application layer owns them and serializes access.

pub mod agent;
pub mod classification;
pub mod config;
pub mod consensus;
pub mod context;
pub mod core;
pub mod prompt;
pub mod quality;
pub mod reputation;
pub mod report;
pub mod resilience;
pub mod response;

// Re-export commonly used types
pub use agent::{AgentProfile, AgentRegistry, DomainAffinity};
pub use classification::{DomainClassification, ForecastDomain, classify};
pub use config::{ConfigIssue, ConfigIssueCode, OutputFormat, Severity};
pub use consensus::{
    AgreementLevel, Aggregation, ConsensusParams, ConsensusResult, ExclusionReason,
    WeightBreakdown, aggregate,
};
pub use context::{ContextBundle, ContextQuery, ContextSnippet};
pub use core::{error::DomainError, question::Question};
pub use prompt::PromptTemplate;
pub use quality::{QualityAssessor, QualityPolicy, QualityScore, QualitySummary, RedFlag};
pub use reputation::{
    AgentPrediction, NeutralPerformance, OutcomeApplied, PerformanceLookup, ReputationBook,
    ReputationPolicy, ReputationRecord,
};
pub use report::{ConfidenceDistribution, Report, ResponseRecord, RoundMetrics, RoundTiming};
pub use resilience::{
    CacheKey, CachePolicy, CacheStats, CacheTtls, CircuitBreaker, CircuitBreakerConfig,
    CircuitBreakerSnapshot, CircuitState, ResponseCache,
};
pub use response::{AgentResponse, AttemptStatus, FailureKind, ScoredResponse, parse_agent_reply};
