//! Dispatcher: one concurrent fan-out of agent calls.
//!
//! Calls run as futures polled by the dispatching task, not as spawned
//! tasks. When the pass deadline fires or the round is cancelled, the
//! remaining futures are dropped on the spot, so a straggler can never
//! finish later and touch the gateway's cache or breakers.

use crate::gateway::{GatewayError, GenerationGateway};
use crate::ports::generation_backend::{BackendErrorKind, GenerationBackend};
use crate::ports::progress::RoundProgressNotifier;
use foresight_domain::response::ReplyParseError;
use foresight_domain::{AgentProfile, AgentResponse, CachePolicy, FailureKind, parse_agent_reply};
use futures::stream::{FuturesUnordered, StreamExt};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// One prompt for one agent.
#[derive(Debug, Clone)]
pub struct AgentCall {
    pub profile: AgentProfile,
    pub prompt: String,
    pub attempt_index: u32,
}

/// Result of a dispatch pass, in the order calls were given.
#[derive(Debug, Clone)]
pub struct DispatchOutcome {
    pub responses: Vec<AgentResponse>,
    /// Calls still outstanding when the deadline fired
    pub stragglers: usize,
    pub cancelled: bool,
}

impl DispatchOutcome {
    pub fn successes(&self) -> usize {
        self.responses.iter().filter(|r| r.is_success()).count()
    }
}

pub struct Dispatcher<B: GenerationBackend + 'static> {
    gateway: Arc<GenerationGateway<B>>,
    call_timeout: Duration,
}

impl<B: GenerationBackend + 'static> Dispatcher<B> {
    pub fn new(gateway: Arc<GenerationGateway<B>>, call_timeout: Duration) -> Self {
        Self {
            gateway,
            call_timeout,
        }
    }

    /// Issue every call concurrently and wait until all settle, `deadline`
    /// elapses, or `cancel` fires.
    ///
    /// Calls that did not settle become failed responses
    /// (`deadline_exceeded` or `cancelled`).
    pub async fn dispatch(
        &self,
        calls: Vec<AgentCall>,
        deadline: Duration,
        cancel: &CancellationToken,
        progress: &dyn RoundProgressNotifier,
    ) -> DispatchOutcome {
        let mut slots: Vec<Option<AgentResponse>> = vec![None; calls.len()];
        let mut cancelled = false;

        {
            let mut pending: FuturesUnordered<_> = calls
                .iter()
                .enumerate()
                .map(|(i, call)| async move { (i, self.call_agent(call).await) })
                .collect();

            let timer = tokio::time::sleep(deadline);
            tokio::pin!(timer);

            loop {
                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => {
                        cancelled = true;
                        break;
                    }
                    _ = &mut timer => break,
                    next = pending.next() => match next {
                        Some((i, response)) => {
                            progress.on_agent_complete(&response.agent_name, response.is_success());
                            slots[i] = Some(response);
                        }
                        None => break,
                    }
                }
            }
        }

        let mut stragglers = 0;
        let responses = calls
            .iter()
            .zip(slots)
            .map(|(call, slot)| {
                slot.unwrap_or_else(|| {
                    stragglers += 1;
                    let (kind, reason) = if cancelled {
                        (FailureKind::Cancelled, "round cancelled".to_string())
                    } else {
                        (
                            FailureKind::DeadlineExceeded,
                            format!("no response within {}s round deadline", deadline.as_secs()),
                        )
                    };
                    progress.on_agent_complete(&call.profile.name, false);
                    AgentResponse::failure(
                        &call.profile.name,
                        &call.profile.model,
                        call.attempt_index,
                        kind,
                        reason,
                    )
                })
            })
            .collect();

        if stragglers > 0 {
            warn!(stragglers, cancelled, "Dispatch ended with outstanding calls");
        }

        DispatchOutcome {
            responses,
            stragglers: if cancelled { 0 } else { stragglers },
            cancelled,
        }
    }

    async fn call_agent(&self, call: &AgentCall) -> AgentResponse {
        let profile = &call.profile;
        let result = self
            .gateway
            .invoke(&profile.model, &call.prompt, self.call_timeout, CachePolicy::AdHoc)
            .await;

        let generation = match result {
            Ok(generation) => generation,
            Err(e) => {
                let kind = match &e {
                    GatewayError::CircuitOpen { .. } => FailureKind::CircuitOpen,
                    GatewayError::Backend { error, .. } => match error.kind {
                        BackendErrorKind::Transient => FailureKind::Transient,
                        BackendErrorKind::Permanent => FailureKind::Permanent,
                    },
                };
                info!(agent = %profile.name, attempt = call.attempt_index, error = %e, "Agent call failed");
                return AgentResponse::failure(
                    &profile.name,
                    &profile.model,
                    call.attempt_index,
                    kind,
                    e.to_string(),
                );
            }
        };

        match parse_agent_reply(&generation.text) {
            Ok(parsed) => {
                debug!(
                    agent = %profile.name,
                    attempt = call.attempt_index,
                    probability = parsed.probability,
                    confidence = parsed.confidence,
                    elapsed_ms = generation.elapsed_ms,
                    cache_hit = generation.cache_hit,
                    "Agent responded"
                );
                AgentResponse::success(
                    &profile.name,
                    &profile.model,
                    call.attempt_index,
                    generation.text,
                    parsed.analysis,
                    parsed.probability,
                    parsed.confidence,
                    generation.elapsed_ms,
                    generation.cache_hit,
                )
                .with_recommendation(parsed.recommendation)
            }
            Err(e) => {
                let kind = match e {
                    ReplyParseError::Declined(_) => FailureKind::Declined,
                    ReplyParseError::NoProbability => FailureKind::Unparseable,
                };
                let reason = match e {
                    ReplyParseError::Declined(reason) => reason,
                    other => other.to_string(),
                };
                info!(agent = %profile.name, %kind, "Agent reply not usable");
                AgentResponse::failure(&profile.name, &profile.model, call.attempt_index, kind, reason)
                    .with_raw_text(generation.text)
                    .with_timing(generation.elapsed_ms, generation.cache_hit)
            }
        }
    }
}
