//! Report repository port
//!
//! Persists round reports so outcomes can be recorded later by question id.

use async_trait::async_trait;
use foresight_domain::Report;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportRepositoryError {
    #[error("Failed to save report {question_id}: {reason}")]
    Save { question_id: String, reason: String },

    #[error("Failed to load report {question_id}: {reason}")]
    Load { question_id: String, reason: String },
}

#[async_trait]
pub trait ReportRepository: Send + Sync {
    async fn save(&self, report: &Report) -> Result<(), ReportRepositoryError>;

    /// `Ok(None)` when no report exists for `question_id`.
    async fn load(&self, question_id: &str) -> Result<Option<Report>, ReportRepositoryError>;
}
