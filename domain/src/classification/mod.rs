//! Question domain classification.
//!
//! A deterministic, table-driven mapping from question text to a
//! [`DomainClassification`]. Domains and keyword weights are static data in
//! [`keywords`]; nothing is registered at runtime.

pub mod classifier;
pub mod domain;
pub mod keywords;

pub use classifier::{DomainClassification, DomainScore, classify};
pub use domain::ForecastDomain;
