//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod dispatch;
pub mod record_outcome;
pub(crate) mod requery;
pub mod run_forecast;
