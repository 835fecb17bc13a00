//! Circuit breaker for a single backend endpoint.
//!
//! ```text
//!            failures >= failure_threshold
//!   CLOSED ---------------------------------> OPEN
//!     ^                                       |  ^
//!     | successes >= success_threshold        |  | probe failure
//!     |                          open_timeout |  | (timer restarts)
//!     +------------- HALF_OPEN <--------------+--+
//! ```
//!
//! HALF_OPEN admits at most `half_open_max_probes` concurrent probes.
//! There is no direct OPEN -> CLOSED edge.
//!
//! This departs from the usual breaker, where any probe failure reopens:
//! only transient failures count as probe failures. A probe that ends in a
//! permanent error (unknown model, malformed request) proved the endpoint
//! answered, so the gateway settles it with [`CircuitBreaker::release`]:
//! the probe slot is freed and the breaker stays HALF_OPEN instead of
//! reopening.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CircuitState {
    Closed,
    Open,
    HalfOpen,
}

impl fmt::Display for CircuitState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CircuitState::Closed => write!(f, "CLOSED"),
            CircuitState::Open => write!(f, "OPEN"),
            CircuitState::HalfOpen => write!(f, "HALF_OPEN"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CircuitBreakerConfig {
    /// Consecutive exhausted calls before the circuit opens
    pub failure_threshold: u32,
    /// How long the circuit stays open before probing
    pub open_timeout: Duration,
    /// Consecutive probe successes needed to close
    pub success_threshold: u32,
    /// Concurrent probes admitted while half-open
    pub half_open_max_probes: u32,
}

impl Default for CircuitBreakerConfig {
    fn default() -> Self {
        Self {
            failure_threshold: 5,
            open_timeout: Duration::from_secs(60),
            success_threshold: 2,
            half_open_max_probes: 3,
        }
    }
}

/// How a call was let through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    Normal,
    /// A half-open probe; holds one probe slot until settled
    Probe,
}

impl Admission {
    pub fn is_probe(&self) -> bool {
        matches!(self, Admission::Probe)
    }
}

/// Why a call was refused without touching the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakerRejection {
    Open { retry_after: Duration },
    ProbesExhausted,
}

impl fmt::Display for BreakerRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BreakerRejection::Open { retry_after } => {
                write!(f, "circuit open, retry after {}ms", retry_after.as_millis())
            }
            BreakerRejection::ProbesExhausted => write!(f, "circuit half-open, probes exhausted"),
        }
    }
}

/// A state change, reported so callers can log it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: CircuitState,
    pub to: CircuitState,
}

/// Point-in-time view of a breaker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CircuitBreakerSnapshot {
    pub state: CircuitState,
    pub consecutive_failures: u32,
    pub consecutive_successes: u32,
    /// Time since the circuit last opened, while open or half-open
    pub open_for_ms: Option<u64>,
    pub trips: u64,
}

#[derive(Debug, Clone)]
pub struct CircuitBreaker {
    config: CircuitBreakerConfig,
    state: CircuitState,
    consecutive_failures: u32,
    consecutive_successes: u32,
    opened_at: Option<Instant>,
    probes_in_flight: u32,
    trips: u64,
}

impl CircuitBreaker {
    pub fn new(config: CircuitBreakerConfig) -> Self {
        Self {
            config,
            state: CircuitState::Closed,
            consecutive_failures: 0,
            consecutive_successes: 0,
            opened_at: None,
            probes_in_flight: 0,
            trips: 0,
        }
    }

    pub fn state(&self) -> CircuitState {
        self.state
    }

    pub fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures
    }

    pub fn consecutive_successes(&self) -> u32 {
        self.consecutive_successes
    }

    pub fn opened_at(&self) -> Option<Instant> {
        self.opened_at
    }

    /// Number of CLOSED/HALF_OPEN -> OPEN transitions so far.
    pub fn trips(&self) -> u64 {
        self.trips
    }

    /// Ask to make a call at `now`.
    ///
    /// An open circuit whose timeout has elapsed moves to HALF_OPEN here.
    pub fn try_acquire(
        &mut self,
        now: Instant,
    ) -> (Result<Admission, BreakerRejection>, Option<Transition>) {
        let mut transition = None;

        if self.state == CircuitState::Open {
            let opened_at = self.opened_at.unwrap_or(now);
            let elapsed = now.saturating_duration_since(opened_at);
            if elapsed < self.config.open_timeout {
                let rejection = BreakerRejection::Open {
                    retry_after: self.config.open_timeout - elapsed,
                };
                return (Err(rejection), None);
            }
            transition = self.move_to(CircuitState::HalfOpen);
            self.consecutive_successes = 0;
            self.probes_in_flight = 0;
        }

        let admission = match self.state {
            CircuitState::Closed => Ok(Admission::Normal),
            CircuitState::HalfOpen if self.probes_in_flight < self.config.half_open_max_probes => {
                self.probes_in_flight += 1;
                Ok(Admission::Probe)
            }
            CircuitState::HalfOpen => Err(BreakerRejection::ProbesExhausted),
            CircuitState::Open => Err(BreakerRejection::Open {
                retry_after: self.config.open_timeout,
            }),
        };
        (admission, transition)
    }

    /// Record a successful call.
    pub fn record_success(&mut self, admission: Admission) -> Option<Transition> {
        self.release_probe(admission);
        self.consecutive_failures = 0;

        if self.state == CircuitState::HalfOpen && admission.is_probe() {
            self.consecutive_successes += 1;
            if self.consecutive_successes >= self.config.success_threshold {
                self.consecutive_successes = 0;
                self.opened_at = None;
                self.probes_in_flight = 0;
                return self.move_to(CircuitState::Closed);
            }
        }
        None
    }

    /// Record a call whose retries were exhausted.
    pub fn record_failure(&mut self, admission: Admission, now: Instant) -> Option<Transition> {
        self.release_probe(admission);
        self.consecutive_failures = self.consecutive_failures.saturating_add(1);

        match self.state {
            CircuitState::HalfOpen => self.trip(now),
            CircuitState::Closed if self.consecutive_failures >= self.config.failure_threshold => {
                self.trip(now)
            }
            _ => None,
        }
    }

    /// Settle an admission without judging endpoint health (permanent
    /// errors, dropped calls).
    pub fn release(&mut self, admission: Admission) {
        self.release_probe(admission);
    }

    pub fn snapshot(&self, now: Instant) -> CircuitBreakerSnapshot {
        CircuitBreakerSnapshot {
            state: self.state,
            consecutive_failures: self.consecutive_failures,
            consecutive_successes: self.consecutive_successes,
            open_for_ms: self
                .opened_at
                .map(|at| now.saturating_duration_since(at).as_millis() as u64),
            trips: self.trips,
        }
    }

    fn trip(&mut self, now: Instant) -> Option<Transition> {
        self.opened_at = Some(now);
        self.consecutive_successes = 0;
        self.probes_in_flight = 0;
        self.trips += 1;
        self.move_to(CircuitState::Open)
    }

    fn release_probe(&mut self, admission: Admission) {
        if admission.is_probe() && self.state == CircuitState::HalfOpen {
            self.probes_in_flight = self.probes_in_flight.saturating_sub(1);
        }
    }

    fn move_to(&mut self, to: CircuitState) -> Option<Transition> {
        let from = self.state;
        self.state = to;
        (from != to).then_some(Transition { from, to })
    }
}

impl Default for CircuitBreaker {
    fn default() -> Self {
        Self::new(CircuitBreakerConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> CircuitBreakerConfig {
        CircuitBreakerConfig {
            failure_threshold: 3,
            open_timeout: Duration::from_secs(60),
            success_threshold: 2,
            half_open_max_probes: 2,
        }
    }

    fn acquire(cb: &mut CircuitBreaker, now: Instant) -> Admission {
        cb.try_acquire(now).0.unwrap()
    }

    fn open(cb: &mut CircuitBreaker, now: Instant) {
        for _ in 0..cb.config.failure_threshold {
            let a = acquire(cb, now);
            cb.record_failure(a, now);
        }
    }

    #[test]
    fn test_opens_after_exact_threshold() {
        let mut cb = CircuitBreaker::new(config());
        let t0 = Instant::now();
        for i in 0..2 {
            let a = acquire(&mut cb, t0);
            assert_eq!(cb.record_failure(a, t0), None, "failure {i}");
            assert_eq!(cb.state(), CircuitState::Closed);
        }
        let a = acquire(&mut cb, t0);
        assert_eq!(
            cb.record_failure(a, t0),
            Some(Transition {
                from: CircuitState::Closed,
                to: CircuitState::Open
            })
        );
        assert_eq!(cb.opened_at(), Some(t0));
        assert_eq!(cb.trips(), 1);
    }

    #[test]
    fn test_success_resets_failures() {
        let mut cb = CircuitBreaker::new(config());
        let t0 = Instant::now();
        for _ in 0..2 {
            let a = acquire(&mut cb, t0);
            cb.record_failure(a, t0);
        }
        let a = acquire(&mut cb, t0);
        cb.record_success(a);
        assert_eq!(cb.consecutive_failures(), 0);
        let a = acquire(&mut cb, t0);
        cb.record_failure(a, t0);
        assert_eq!(cb.state(), CircuitState::Closed);
    }

    #[test]
    fn test_open_fails_fast_until_timeout() {
        let mut cb = CircuitBreaker::new(config());
        let t0 = Instant::now();
        open(&mut cb, t0);

        let (result, transition) = cb.try_acquire(t0 + Duration::from_secs(59));
        assert_eq!(
            result,
            Err(BreakerRejection::Open {
                retry_after: Duration::from_secs(1)
            })
        );
        assert_eq!(transition, None);
        assert_eq!(cb.state(), CircuitState::Open);
    }

    #[test]
    fn test_probe_failure_reopens_and_restarts_timer() {
        let mut cb = CircuitBreaker::new(config());
        let t0 = Instant::now();
        open(&mut cb, t0);

        let t1 = t0 + Duration::from_secs(60);
        let (result, transition) = cb.try_acquire(t1);
        assert_eq!(result, Ok(Admission::Probe));
        assert_eq!(
            transition,
            Some(Transition {
                from: CircuitState::Open,
                to: CircuitState::HalfOpen
            })
        );

        let t2 = t1 + Duration::from_secs(1);
        assert_eq!(
            cb.record_failure(Admission::Probe, t2),
            Some(Transition {
                from: CircuitState::HalfOpen,
                to: CircuitState::Open
            })
        );
        assert_eq!(cb.opened_at(), Some(t2));
        assert_eq!(cb.trips(), 2);

        // Timer restarted from t2, not t0
        assert!(cb.try_acquire(t2 + Duration::from_secs(59)).0.is_err());
        assert!(cb.try_acquire(t2 + Duration::from_secs(60)).0.is_ok());
    }

    #[test]
    fn test_half_open_closes_after_success_threshold() {
        let mut cb = CircuitBreaker::new(config());
        let t0 = Instant::now();
        open(&mut cb, t0);
        let t1 = t0 + Duration::from_secs(61);

        let first = acquire(&mut cb, t1);
        assert_eq!(cb.record_success(first), None);
        assert_eq!(cb.state(), CircuitState::HalfOpen);

        let second = acquire(&mut cb, t1);
        assert_eq!(
            cb.record_success(second),
            Some(Transition {
                from: CircuitState::HalfOpen,
                to: CircuitState::Closed
            })
        );
        assert_eq!(cb.opened_at(), None);
        assert_eq!(acquire(&mut cb, t1), Admission::Normal);
    }

    #[test]
    fn test_half_open_limits_concurrent_probes() {
        let mut cb = CircuitBreaker::new(config());
        let t0 = Instant::now();
        open(&mut cb, t0);
        let t1 = t0 + Duration::from_secs(60);

        assert_eq!(acquire(&mut cb, t1), Admission::Probe);
        assert_eq!(acquire(&mut cb, t1), Admission::Probe);
        assert_eq!(
            cb.try_acquire(t1).0,
            Err(BreakerRejection::ProbesExhausted)
        );

        cb.release(Admission::Probe);
        assert_eq!(acquire(&mut cb, t1), Admission::Probe);
    }

    #[test]
    fn test_never_skips_half_open() {
        let mut cb = CircuitBreaker::new(config());
        let t0 = Instant::now();
        open(&mut cb, t0);
        // A straggling success from before the trip must not close the circuit
        assert_eq!(cb.record_success(Admission::Normal), None);
        assert_eq!(cb.state(), CircuitState::Open);
    }

    #[test]
    fn test_snapshot() {
        let mut cb = CircuitBreaker::new(config());
        let t0 = Instant::now();
        open(&mut cb, t0);
        let snap = cb.snapshot(t0 + Duration::from_millis(1500));
        assert_eq!(snap.state, CircuitState::Open);
        assert_eq!(snap.consecutive_failures, 3);
        assert_eq!(snap.open_for_ms, Some(1500));
        assert_eq!(snap.trips, 1);
    }
}
