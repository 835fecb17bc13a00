//! Generation gateway
//!
//! Single point of contact with the generation backend. Owns the response
//! cache and one circuit breaker per endpoint; both live behind one mutex so
//! concurrent agents sharing an endpoint mutate them atomically.
//!
//! ```text
//! invoke ──▶ cache fresh? ──yes──▶ Ok(cache_hit)         (breaker untouched)
//!                │ no
//!                ▼
//!            breaker admits? ──no──▶ Err(CircuitOpen)    (no network)
//!                │
//!                ▼
//!            attempt ──transient──▶ backoff, retry       (normal admissions only)
//!                │ ok                    │ exhausted / permanent
//!                ▼                       ▼
//!            cache write,            record failure (transient)
//!            record success          or release (permanent)
//! ```

use crate::config::GatewayParams;
use crate::ports::generation_backend::{BackendError, BackendErrorKind, GenerationBackend};
use foresight_domain::{
    CacheKey, CachePolicy, CacheStats, CircuitBreaker, CircuitBreakerSnapshot, CircuitState,
    ResponseCache,
};
use foresight_domain::resilience::{Admission, BreakerRejection, Transition};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, info, warn};

/// A completed generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generation {
    pub text: String,
    pub elapsed_ms: u64,
    pub cache_hit: bool,
}

/// Why `invoke` produced no text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    #[error("transient: circuit_open for {endpoint} ({rejection})")]
    CircuitOpen {
        endpoint: String,
        rejection: BreakerRejection,
    },

    #[error("{error} (after {attempts} attempt(s))")]
    Backend { error: BackendError, attempts: u32 },
}

impl GatewayError {
    pub fn kind(&self) -> BackendErrorKind {
        match self {
            GatewayError::CircuitOpen { .. } => BackendErrorKind::Transient,
            GatewayError::Backend { error, .. } => error.kind,
        }
    }

    pub fn is_circuit_open(&self) -> bool {
        matches!(self, GatewayError::CircuitOpen { .. })
    }
}

/// Breaker snapshot for one endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EndpointStatus {
    pub endpoint: String,
    #[serde(flatten)]
    pub breaker: CircuitBreakerSnapshot,
}

#[derive(Default)]
struct GatewayState {
    cache: ResponseCache,
    breakers: HashMap<String, CircuitBreaker>,
}

/// Cached, circuit-broken, retrying front for a [`GenerationBackend`].
pub struct GenerationGateway<B: GenerationBackend + 'static> {
    backend: Arc<B>,
    params: GatewayParams,
    state: Mutex<GatewayState>,
}

/// Current time on the tokio clock, so paused-time tests drive the breaker.
fn now() -> Instant {
    tokio::time::Instant::now().into_std()
}

fn elapsed_ms(since: tokio::time::Instant) -> u64 {
    since.elapsed().as_millis() as u64
}

fn log_transition(endpoint: &str, transition: Transition) {
    match transition.to {
        CircuitState::Open => warn!(
            endpoint,
            from = %transition.from,
            "Circuit opened, failing fast until the open timeout elapses"
        ),
        CircuitState::HalfOpen => info!(endpoint, "Circuit half-open, admitting probes"),
        CircuitState::Closed => info!(endpoint, from = %transition.from, "Circuit closed"),
    }
}

impl<B: GenerationBackend + 'static> GenerationGateway<B> {
    pub fn new(backend: Arc<B>, params: GatewayParams) -> Self {
        Self {
            backend,
            params,
            state: Mutex::new(GatewayState::default()),
        }
    }

    pub fn params(&self) -> &GatewayParams {
        &self.params
    }

    /// Generate text for `prompt` on `model_id`.
    pub async fn invoke(
        &self,
        model_id: &str,
        prompt: &str,
        timeout: Duration,
        policy: CachePolicy,
    ) -> Result<Generation, GatewayError> {
        let started = tokio::time::Instant::now();
        let key = CacheKey::new(model_id, prompt);

        if self.params.cache_enabled {
            let cached = self.lock().cache.get(&key, now());
            if let Some(text) = cached {
                debug!(model = model_id, key = %key, "Cache hit");
                return Ok(Generation {
                    text,
                    elapsed_ms: elapsed_ms(started),
                    cache_hit: true,
                });
            }
        }

        let endpoint = self.backend.endpoint(model_id);
        let admission = self.acquire(&endpoint)?;
        let mut guard = AdmissionGuard {
            gateway: self,
            endpoint: &endpoint,
            admission: Some(admission),
        };

        // Probes get exactly one attempt.
        let max_attempts = if admission.is_probe() {
            1
        } else {
            1 + self.params.max_retries
        };

        let mut attempts = 0;
        let outcome = loop {
            attempts += 1;
            let result =
                match tokio::time::timeout(timeout, self.backend.generate(model_id, prompt, timeout))
                    .await
                {
                    Ok(result) => result,
                    Err(_) => Err(BackendError::transient(format!(
                        "timed out after {}ms",
                        timeout.as_millis()
                    ))),
                };

            match result {
                Ok(text) => break Ok(text),
                Err(error) if error.is_transient() && attempts < max_attempts => {
                    let delay = self.params.backoff_for(attempts - 1);
                    debug!(
                        model = model_id,
                        attempt = attempts,
                        delay_ms = delay.as_millis() as u64,
                        error = %error,
                        "Transient backend failure, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(error) => break Err(error),
            }
        };

        let admission = guard.settle();
        let mut locked = self.lock();
        let state = &mut *locked;
        let breaker = state
            .breakers
            .entry(endpoint.clone())
            .or_insert_with(|| CircuitBreaker::new(self.params.breaker));

        match outcome {
            Ok(text) => {
                if let Some(t) = breaker.record_success(admission) {
                    log_transition(&endpoint, t);
                }
                if self.params.cache_enabled {
                    let ttl = self.params.cache_ttls.ttl_for(policy);
                    state.cache.insert(key, text.clone(), ttl, now());
                }
                Ok(Generation {
                    text,
                    elapsed_ms: elapsed_ms(started),
                    cache_hit: false,
                })
            }
            Err(error) => {
                match error.kind {
                    BackendErrorKind::Transient => {
                        if let Some(t) = breaker.record_failure(admission, now()) {
                            log_transition(&endpoint, t);
                        }
                    }
                    BackendErrorKind::Permanent => breaker.release(admission),
                }
                warn!(model = model_id, attempts, error = %error, "Generation failed");
                Err(GatewayError::Backend { error, attempts })
            }
        }
    }

    /// Snapshot of every endpoint's breaker, sorted by endpoint.
    pub fn breaker_status(&self) -> Vec<EndpointStatus> {
        let at = now();
        let state = self.lock();
        let mut status: Vec<_> = state
            .breakers
            .iter()
            .map(|(endpoint, breaker)| EndpointStatus {
                endpoint: endpoint.clone(),
                breaker: breaker.snapshot(at),
            })
            .collect();
        status.sort_by(|a, b| a.endpoint.cmp(&b.endpoint));
        status
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.lock().cache.stats()
    }

    /// Drop stale cache entries; returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        self.lock().cache.purge_expired(now())
    }

    /// Breaker openings across all endpoints since start-up.
    pub fn total_trips(&self) -> u64 {
        self.lock().breakers.values().map(CircuitBreaker::trips).sum()
    }

    fn acquire(&self, endpoint: &str) -> Result<Admission, GatewayError> {
        let mut state = self.lock();
        let breaker = state
            .breakers
            .entry(endpoint.to_string())
            .or_insert_with(|| CircuitBreaker::new(self.params.breaker));
        let (admission, transition) = breaker.try_acquire(now());
        if let Some(t) = transition {
            log_transition(endpoint, t);
        }
        admission.map_err(|rejection| {
            debug!(endpoint, %rejection, "Call rejected by circuit breaker");
            GatewayError::CircuitOpen {
                endpoint: endpoint.to_string(),
                rejection,
            }
        })
    }

    fn lock(&self) -> MutexGuard<'_, GatewayState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Releases a breaker admission if the call is dropped before it settles
/// (round deadline, cancellation).
struct AdmissionGuard<'a, B: GenerationBackend + 'static> {
    gateway: &'a GenerationGateway<B>,
    endpoint: &'a str,
    admission: Option<Admission>,
}

impl<B: GenerationBackend + 'static> AdmissionGuard<'_, B> {
    fn settle(&mut self) -> Admission {
        self.admission.take().unwrap_or(Admission::Normal)
    }
}

impl<B: GenerationBackend + 'static> Drop for AdmissionGuard<'_, B> {
    fn drop(&mut self) {
        if let Some(admission) = self.admission.take() {
            let mut state = self.gateway.lock();
            if let Some(breaker) = state.breakers.get_mut(self.endpoint) {
                breaker.release(admission);
            }
        }
    }
}
