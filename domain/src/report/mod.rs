//! Round report: the serializable audit record handed to persistence and UI.

mod entities;
mod insights;

pub use entities::{
    ConfidenceDistribution, Report, ResponseRecord, RoundMetrics, RoundTiming, question_id,
};
