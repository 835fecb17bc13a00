//! Analytical depth scoring of agent responses.
//!
//! The [`QualityAssessor`] scores six heuristic dimensions from response
//! text, subtracts red-flag penalties and decides whether the agent should
//! be asked again with targeted follow-up questions.
//!
//! ```text
//! depth = 0.25 evidence + 0.20 causal + 0.15 uncertainty
//!       + 0.15 counterarguments + 0.15 specificity + 0.10 temporal
//!       - min(0.3, 0.1 x red_flags)
//! ```

pub mod assessor;
pub mod score;
pub mod summary;

pub use assessor::{QualityAssessor, QualityPolicy};
pub use score::{DimensionScores, QualityDimension, QualityScore, RedFlag};
pub use summary::QualitySummary;
