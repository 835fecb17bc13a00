//! Record Outcome use case
//!
//! Feeds a verified outcome back into the reputation store. Only the final
//! successful attempt of each agent in the stored report is scored.

use crate::ports::report_repository::{ReportRepository, ReportRepositoryError};
use crate::ports::reputation_store::{ReputationStore, ReputationStoreError};
use crate::ports::round_logger::{NoRoundLogger, RoundEvent, RoundLogger};
use chrono::Utc;
use foresight_domain::OutcomeApplied;
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum RecordOutcomeError {
    #[error("No report stored for question {0}")]
    ReportNotFound(String),

    #[error(transparent)]
    Repository(#[from] ReportRepositoryError),

    #[error(transparent)]
    Store(#[from] ReputationStoreError),
}

pub struct RecordOutcomeUseCase {
    reports: Arc<dyn ReportRepository>,
    reputation: Arc<dyn ReputationStore>,
    logger: Arc<dyn RoundLogger>,
}

impl RecordOutcomeUseCase {
    pub fn new(reports: Arc<dyn ReportRepository>, reputation: Arc<dyn ReputationStore>) -> Self {
        Self {
            reports,
            reputation,
            logger: Arc::new(NoRoundLogger),
        }
    }

    pub fn with_logger(mut self, logger: Arc<dyn RoundLogger>) -> Self {
        self.logger = logger;
        self
    }

    /// Record whether the forecast event occurred.
    ///
    /// Recording the same question twice is a no-op reported through
    /// [`OutcomeApplied::duplicate`].
    pub async fn execute(
        &self,
        question_id: &str,
        occurred: bool,
    ) -> Result<OutcomeApplied, RecordOutcomeError> {
        let report = self
            .reports
            .load(question_id)
            .await?
            .ok_or_else(|| RecordOutcomeError::ReportNotFound(question_id.to_string()))?;

        let predictions = report.final_predictions();
        let domain = report.classification.primary_domain;
        let applied = self
            .reputation
            .record_outcome(question_id, domain, &predictions, occurred, Utc::now())
            .await?;

        info!(
            question_id,
            domain = %domain,
            occurred,
            agents = applied.updates.len(),
            duplicate = applied.duplicate,
            "Outcome recorded"
        );
        self.logger.log(RoundEvent::new(
            "outcome",
            json!({
                "question_id": question_id,
                "occurred": occurred,
                "duplicate": applied.duplicate,
                "updates": applied.updates,
            }),
        ));
        Ok(applied)
    }
}
