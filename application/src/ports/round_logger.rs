//! Port for the structured round audit log.
//!
//! Separate from `tracing`: tracing carries human-readable diagnostics,
//! while this port records the machine-readable history of each round
//! (one JSON object per event).

use serde_json::Value;

/// A structured round event.
pub struct RoundEvent {
    /// Event type identifier (`round_start`, `agent_response`, `requery`,
    /// `consensus`, `round_end`, `outcome`).
    pub event_type: &'static str,
    pub payload: Value,
}

impl RoundEvent {
    pub fn new(event_type: &'static str, payload: Value) -> Self {
        Self {
            event_type,
            payload,
        }
    }
}

/// Sink for round events.
///
/// `log` is synchronous and non-fallible; implementations swallow their own
/// I/O errors so auditing never disturbs a round.
pub trait RoundLogger: Send + Sync {
    fn log(&self, event: RoundEvent);
}

/// No-op implementation for tests and when auditing is disabled.
pub struct NoRoundLogger;

impl RoundLogger for NoRoundLogger {
    fn log(&self, _event: RoundEvent) {}
}
