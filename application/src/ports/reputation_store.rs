//! Reputation store port
//!
//! Reads hand out an immutable snapshot of the whole book, so the hot path
//! takes no lock beyond cloning an `Arc`. Writes happen only through
//! outcome ingestion and swap in a new book.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use foresight_domain::{AgentPrediction, ForecastDomain, OutcomeApplied, ReputationBook};
use std::sync::{Arc, RwLock};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReputationStoreError {
    #[error("Failed to read reputation data: {0}")]
    Read(String),

    #[error("Failed to write reputation data: {0}")]
    Write(String),
}

#[async_trait]
pub trait ReputationStore: Send + Sync {
    /// Consistent point-in-time view used for weighting.
    async fn snapshot(&self) -> Result<Arc<ReputationBook>, ReputationStoreError>;

    /// Fold a verified outcome into the book and persist it.
    async fn record_outcome(
        &self,
        question_id: &str,
        domain: ForecastDomain,
        predictions: &[AgentPrediction],
        occurred: bool,
        now: DateTime<Utc>,
    ) -> Result<OutcomeApplied, ReputationStoreError>;
}

/// Process-local store; history is lost on exit.
#[derive(Default)]
pub struct InMemoryReputationStore {
    book: RwLock<Arc<ReputationBook>>,
}

impl InMemoryReputationStore {
    pub fn new(book: ReputationBook) -> Self {
        Self {
            book: RwLock::new(Arc::new(book)),
        }
    }
}

#[async_trait]
impl ReputationStore for InMemoryReputationStore {
    async fn snapshot(&self) -> Result<Arc<ReputationBook>, ReputationStoreError> {
        let guard = self.book.read().unwrap_or_else(|e| e.into_inner());
        Ok(Arc::clone(&guard))
    }

    async fn record_outcome(
        &self,
        question_id: &str,
        domain: ForecastDomain,
        predictions: &[AgentPrediction],
        occurred: bool,
        now: DateTime<Utc>,
    ) -> Result<OutcomeApplied, ReputationStoreError> {
        let mut guard = self.book.write().unwrap_or_else(|e| e.into_inner());
        let mut next = ReputationBook::clone(&guard);
        let applied = next.record_outcome(question_id, domain, predictions, occurred, now);
        *guard = Arc::new(next);
        Ok(applied)
    }
}
