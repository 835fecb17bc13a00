//! Per-agent, per-domain historical accuracy.
//!
//! Records are updated only when a forecast's outcome is verified. The
//! combined accuracy blends lifetime, recent-window and calibration terms,
//! then shrinks towards a neutral 0.5 while the sample is small:
//!
//! ```text
//! component   = 1 - (p - outcome)^2
//! combined    = 0.5 lifetime + 0.3 recent + 0.2 calibration
//! accuracy    = combined * n/floor + 0.5 * (1 - n/floor)     (n < floor)
//! boost       = clamp(0.5 + accuracy, 0.5, 1.5)
//! ```

pub mod book;
pub mod record;

pub use book::{
    AgentPrediction, NeutralPerformance, OutcomeApplied, PerformanceLookup, RecordUpdate,
    ReputationBook,
};
pub use record::{OutcomeSample, ReputationPolicy, ReputationRecord, performance_boost};
