//! Weighted consensus over agent opinions.
//!
//! Each contributing response is weighted multiplicatively:
//!
//! ```text
//! final_weight = base_weight x relevance_boost x performance_boost
//!              x stated_confidence x depth_score
//! ```
//!
//! Failed, superseded and zero-depth responses are excluded and add nothing
//! to the denominator, except that a round whose accepted answers all
//! scored zero depth is weighted with a small depth floor instead.

pub mod aggregate;
pub mod weights;

pub use aggregate::{
    ACCEPTED_DEPTH_FLOOR, AgreementLevel, Aggregation, ConsensusParams, ConsensusResult, aggregate,
};
pub use weights::{ExclusionReason, WeightBreakdown, relevance_boost};
