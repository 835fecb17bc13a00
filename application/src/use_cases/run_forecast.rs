//! Run Forecast use case
//!
//! Orchestrates one forecasting round:
//!
//! ```text
//! validate ─▶ select agents ─▶ classify ─▶ context ─▶ dispatch ─▶ score
//!                                                        │
//!                               requery pass(es) ◀───────┘ (shallow answers)
//!                                      │
//!                                      ▼
//!                      settle attempts ─▶ aggregate ─▶ Report
//! ```
//!
//! The round never writes to the reputation store; it only reads a snapshot.

use crate::config::ForecastParams;
use crate::gateway::GenerationGateway;
use crate::ports::agent_source::{AgentSource, AgentSourceError};
use crate::ports::context_provider::{ContextProvider, NoContext};
use crate::ports::generation_backend::GenerationBackend;
use crate::ports::progress::{NoProgress, RoundProgressNotifier};
use crate::ports::reputation_store::{ReputationStore, ReputationStoreError};
use crate::ports::round_logger::{NoRoundLogger, RoundEvent, RoundLogger};
use crate::use_cases::dispatch::{AgentCall, Dispatcher};
use crate::use_cases::requery::{requery_targets, settle};
use chrono::Utc;
use foresight_domain::context::entities::{INITIAL_CONTEXT_BUDGET, REQUERY_CONTEXT_BUDGET};
use foresight_domain::report::question_id;
use foresight_domain::{
    AgentProfile, AgentResponse, ContextBundle, DomainClassification, DomainError,
    PromptTemplate, QualityAssessor, QualitySummary, Question, Report, RoundMetrics,
    RoundTiming, ScoredResponse, aggregate, classify,
};
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Errors that end a round without a report
#[derive(Error, Debug)]
pub enum RunForecastError {
    #[error("Invalid question: {0}")]
    InvalidQuestion(#[source] DomainError),

    #[error("Unknown agent: {0}")]
    UnknownAgent(String),

    #[error("No agents enabled")]
    NoAgents,

    #[error("Insufficient agents: {succeeded} of {called} produced a usable opinion")]
    InsufficientAgents { called: usize, succeeded: usize },

    #[error("Round cancelled")]
    Cancelled,

    #[error("Agent source error: {0}")]
    AgentSource(#[from] AgentSourceError),

    #[error("Reputation store error: {0}")]
    Reputation(#[from] ReputationStoreError),
}

/// Input for the RunForecast use case
#[derive(Debug, Clone)]
pub struct RunForecastInput {
    pub question: String,
    /// Restrict the round to these agents; empty means every enabled agent
    pub agents: Vec<String>,
    pub requery: bool,
}

impl RunForecastInput {
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            agents: Vec::new(),
            requery: true,
        }
    }

    pub fn with_agents(mut self, agents: Vec<String>) -> Self {
        self.agents = agents;
        self
    }

    pub fn without_requery(mut self) -> Self {
        self.requery = false;
        self
    }
}

/// Use case for running a forecasting round
pub struct RunForecastUseCase<B: GenerationBackend + 'static> {
    gateway: Arc<GenerationGateway<B>>,
    agents: Arc<dyn AgentSource>,
    reputation: Arc<dyn ReputationStore>,
    context: Arc<dyn ContextProvider>,
    logger: Arc<dyn RoundLogger>,
    params: ForecastParams,
    cancellation_token: Option<CancellationToken>,
}

impl<B: GenerationBackend + 'static> RunForecastUseCase<B> {
    pub fn new(
        gateway: Arc<GenerationGateway<B>>,
        agents: Arc<dyn AgentSource>,
        reputation: Arc<dyn ReputationStore>,
    ) -> Self {
        Self {
            gateway,
            agents,
            reputation,
            context: Arc::new(NoContext),
            logger: Arc::new(NoRoundLogger),
            params: ForecastParams::default(),
            cancellation_token: None,
        }
    }

    pub fn with_context_provider(mut self, context: Arc<dyn ContextProvider>) -> Self {
        self.context = context;
        self
    }

    pub fn with_logger(mut self, logger: Arc<dyn RoundLogger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn with_params(mut self, params: ForecastParams) -> Self {
        self.params = params;
        self
    }

    /// Set a cancellation token for graceful interruption
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation_token = Some(token);
        self
    }

    pub fn gateway(&self) -> &Arc<GenerationGateway<B>> {
        &self.gateway
    }

    /// Execute the use case with default (no-op) progress
    pub async fn execute(&self, input: RunForecastInput) -> Result<Report, RunForecastError> {
        self.execute_with_progress(input, &NoProgress).await
    }

    /// Execute the use case with progress callbacks
    pub async fn execute_with_progress(
        &self,
        input: RunForecastInput,
        progress: &dyn RoundProgressNotifier,
    ) -> Result<Report, RunForecastError> {
        let started_at = Utc::now();
        let started = tokio::time::Instant::now();
        let cancel = self.cancellation_token.clone().unwrap_or_default();

        let question =
            Question::parse_with_limit(&input.question, self.params.round.max_question_chars)
                .map_err(RunForecastError::InvalidQuestion)?;
        let registry = self.agents.load().await?;
        let profiles = registry.select(&input.agents).map_err(|e| match e {
            DomainError::UnknownAgent(name) => RunForecastError::UnknownAgent(name),
            other => RunForecastError::AgentSource(AgentSourceError::Invalid(other)),
        })?;
        if profiles.is_empty() {
            return Err(RunForecastError::NoAgents);
        }

        let classification = classify(question.content());
        let id = question_id(question.content(), started_at);
        info!(
            question_id = %id,
            domain = %classification.primary_domain,
            confidence = classification.confidence,
            agents = profiles.len(),
            "Starting forecast round"
        );
        self.logger.log(RoundEvent::new(
            "round_start",
            json!({
                "question_id": id,
                "question": question.content(),
                "domain": classification.primary_domain,
                "secondary_domains": classification.secondary_domains,
                "agents": profiles.iter().map(|p| p.name.as_str()).collect::<Vec<_>>(),
            }),
        ));
        progress.on_round_start(question.content(), profiles.len());

        let result = self
            .run_round(
                &id,
                &question,
                &profiles,
                &classification,
                input.requery,
                &cancel,
                progress,
                started_at,
                started,
            )
            .await;

        progress.on_round_complete(result.is_ok());
        let elapsed = started.elapsed().as_millis() as u64;
        match &result {
            Ok(report) => {
                info!(
                    question_id = %id,
                    probability = report.consensus.weighted_probability,
                    agreement = %report.consensus.agreement_level,
                    elapsed_ms = elapsed,
                    "Forecast round complete"
                );
                self.logger.log(RoundEvent::new(
                    "round_end",
                    json!({"question_id": id, "success": true, "elapsed_ms": elapsed}),
                ));
            }
            Err(e) => {
                warn!(question_id = %id, error = %e, "Forecast round failed");
                self.logger.log(RoundEvent::new(
                    "round_end",
                    json!({
                        "question_id": id,
                        "success": false,
                        "error": e.to_string(),
                        "elapsed_ms": elapsed,
                    }),
                ));
            }
        }
        result
    }

    #[allow(clippy::too_many_arguments)]
    async fn run_round(
        &self,
        id: &str,
        question: &Question,
        profiles: &[AgentProfile],
        classification: &DomainClassification,
        requery: bool,
        cancel: &CancellationToken,
        progress: &dyn RoundProgressNotifier,
        started_at: chrono::DateTime<Utc>,
        started: tokio::time::Instant,
    ) -> Result<Report, RunForecastError> {
        let trips_before = self.gateway.total_trips();
        let reputation = self.reputation.snapshot().await?;
        let context = self.load_context(question).await;
        let assessor = QualityAssessor::new(self.params.quality.policy);
        let dispatcher = Dispatcher::new(Arc::clone(&self.gateway), self.params.round.call_timeout);
        let deadline = self.params.round.round_deadline;

        // Initial fan-out
        let initial_block = context.render(INITIAL_CONTEXT_BUDGET);
        let calls = profiles
            .iter()
            .map(|profile| AgentCall {
                profile: profile.clone(),
                prompt: PromptTemplate::agent_prompt(
                    profile,
                    classification,
                    &initial_block,
                    question.content(),
                ),
                attempt_index: 0,
            })
            .collect();
        let outcome = dispatcher.dispatch(calls, deadline, cancel, progress).await;
        let dispatch_elapsed_ms = started.elapsed().as_millis() as u64;
        if outcome.cancelled {
            return Err(RunForecastError::Cancelled);
        }
        if outcome.successes() == 0 {
            return Err(RunForecastError::InsufficientAgents {
                called: profiles.len(),
                succeeded: 0,
            });
        }

        let mut attempts: Vec<ScoredResponse> = outcome
            .responses
            .into_iter()
            .map(|r| score(&assessor, r, question.content()))
            .collect();

        // Requery passes
        let requery_started = tokio::time::Instant::now();
        let budget = if requery {
            self.params.quality.effective_budget()
        } else {
            0
        };
        let requery_block = context.render(REQUERY_CONTEXT_BUDGET);
        // Last requery prompt per agent; an identical one would only replay the cache.
        let mut sent: HashMap<String, String> = HashMap::new();
        for pass in 1..=budget {
            let targets = requery_targets(&attempts);
            let calls: Vec<AgentCall> = targets
                .iter()
                .filter_map(|&i| {
                    let previous = &attempts[i];
                    let profile = profiles
                        .iter()
                        .find(|p| p.name == previous.response.agent_name)?;
                    let follow_ups = previous
                        .quality
                        .as_ref()
                        .map(|q| q.follow_up_questions.clone())
                        .unwrap_or_default();
                    let prompt = PromptTemplate::requery_prompt(
                        profile,
                        question.content(),
                        &requery_block,
                        &previous.response.analysis,
                        &follow_ups,
                    );
                    if sent.get(&profile.name) == Some(&prompt) {
                        debug!(
                            agent = %profile.name,
                            pass,
                            "Requery would repeat the last prompt, skipping"
                        );
                        return None;
                    }
                    Some(AgentCall {
                        profile: profile.clone(),
                        prompt,
                        attempt_index: pass,
                    })
                })
                .collect();
            if calls.is_empty() {
                break;
            }
            for call in &calls {
                sent.insert(call.profile.name.clone(), call.prompt.clone());
            }
            progress.on_requery_start(pass, calls.len());

            debug!(pass, agents = calls.len(), "Requery pass");
            self.logger.log(RoundEvent::new(
                "requery",
                json!({
                    "question_id": id,
                    "pass": pass,
                    "agents": calls.iter().map(|c| c.profile.name.as_str()).collect::<Vec<_>>(),
                }),
            ));

            let outcome = dispatcher.dispatch(calls, deadline, cancel, progress).await;
            if outcome.cancelled {
                return Err(RunForecastError::Cancelled);
            }
            attempts.extend(
                outcome
                    .responses
                    .into_iter()
                    .map(|r| score(&assessor, r, question.content())),
            );
        }
        let requery_elapsed_ms = if budget > 0 {
            requery_started.elapsed().as_millis() as u64
        } else {
            0
        };

        settle(&mut attempts);
        for scored in &attempts {
            self.log_attempt(id, scored);
        }

        progress.on_aggregate();
        let aggregation = aggregate(
            &attempts,
            profiles,
            classification,
            &*reputation,
            &self.params.consensus,
        )
        .map_err(|_| RunForecastError::InsufficientAgents {
            called: profiles.len(),
            succeeded: attempts
                .iter()
                .filter(|s| s.response.is_final() && s.response.is_success())
                .count(),
        })?;

        let consensus = &aggregation.result;
        self.logger.log(RoundEvent::new(
            "consensus",
            json!({
                "question_id": id,
                "weighted_probability": consensus.weighted_probability,
                "weighted_confidence": consensus.weighted_confidence,
                "agreement_level": consensus.agreement_level,
                "outlier_agents": consensus.outlier_agents,
                "dissent_percentage": consensus.dissent_percentage,
                "requires_review": consensus.requires_review,
            }),
        ));

        let finals: Vec<&ScoredResponse> =
            attempts.iter().filter(|s| s.response.is_final()).collect();
        let metrics = RoundMetrics {
            called: profiles.len(),
            succeeded: finals.iter().filter(|s| s.response.is_success()).count(),
            failed: finals.iter().filter(|s| s.response.is_failed()).count(),
            cache_hits: attempts.iter().filter(|s| s.response.cache_hit).count(),
            requeries: attempts
                .iter()
                .filter(|s| s.response.attempt_index > 0)
                .count(),
            breaker_trips: self.gateway.total_trips().saturating_sub(trips_before),
        };
        let quality_summary = QualitySummary::from_final_scores(
            finals.iter().filter_map(|s| {
                s.quality
                    .as_ref()
                    .map(|q| (s.response.agent_name.as_str(), q))
            }),
            metrics.requeries,
            self.params.quality.policy.requery_threshold,
        );
        let timing = RoundTiming {
            started_at,
            finished_at: Utc::now(),
            total_elapsed_ms: started.elapsed().as_millis() as u64,
            dispatch_elapsed_ms,
            requery_elapsed_ms,
        };

        Ok(Report::assemble(
            id.to_string(),
            question.content().to_string(),
            classification.clone(),
            attempts,
            aggregation,
            quality_summary,
            timing,
            metrics,
        ))
    }

    async fn load_context(&self, question: &Question) -> ContextBundle {
        match self
            .context
            .fetch(question.content(), &self.params.context)
            .await
        {
            Ok(snippets) => {
                let snippets = self.params.context.select(snippets, Utc::now());
                debug!(snippets = snippets.len(), "Context loaded");
                ContextBundle::new(snippets)
            }
            Err(e) => {
                warn!(error = %e, "Context provider failed, continuing without context");
                ContextBundle::empty()
            }
        }
    }

    fn log_attempt(&self, id: &str, scored: &ScoredResponse) {
        let r = &scored.response;
        self.logger.log(RoundEvent::new(
            "agent_response",
            json!({
                "question_id": id,
                "agent": r.agent_name,
                "model": r.model,
                "attempt": r.attempt_index,
                "status": r.status,
                "probability": r.stated_probability,
                "confidence": r.stated_confidence,
                "depth_score": scored.quality.as_ref().map(|q| q.depth_score),
                "red_flags": scored.quality.as_ref().map(|q| q.red_flags.clone()),
                "failure": r.failure_reason(),
                "elapsed_ms": r.elapsed_ms,
                "cache_hit": r.cache_hit,
            }),
        ));
    }
}

fn score(assessor: &QualityAssessor, response: AgentResponse, question: &str) -> ScoredResponse {
    if response.is_success() {
        let quality = assessor.score(&response.analysis, question);
        ScoredResponse::new(response, Some(quality))
    } else {
        ScoredResponse::unscored(response)
    }
}
