//! JSON document reputation store.

use super::write_atomic;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use foresight_application::ports::reputation_store::{ReputationStore, ReputationStoreError};
use foresight_domain::{
    AgentPrediction, ForecastDomain, OutcomeApplied, ReputationBook, ReputationPolicy,
};
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use tokio::sync::Mutex;
use tracing::{debug, info};

/// Reputation book persisted as one JSON document.
///
/// Snapshots come from memory; `record_outcome` persists the updated book
/// before publishing it, so a failed write leaves both disk and memory on
/// the previous version.
pub struct JsonReputationStore {
    path: PathBuf,
    book: RwLock<Arc<ReputationBook>>,
    /// Serializes writers across the file write
    write_lock: Mutex<()>,
}

impl JsonReputationStore {
    /// Open the store, starting empty when the file does not exist yet.
    pub async fn open(
        path: impl Into<PathBuf>,
        policy: ReputationPolicy,
    ) -> Result<Self, ReputationStoreError> {
        let path = path.into();
        let book = match tokio::fs::read(&path).await {
            Ok(bytes) => serde_json::from_slice::<ReputationBook>(&bytes)
                .map_err(|e| ReputationStoreError::Read(format!("{}: {e}", path.display())))?
                .with_policy(policy),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "No reputation file yet, starting empty");
                ReputationBook::new(policy)
            }
            Err(e) => {
                return Err(ReputationStoreError::Read(format!(
                    "{}: {e}",
                    path.display()
                )));
            }
        };

        Ok(Self {
            path,
            book: RwLock::new(Arc::new(book)),
            write_lock: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn current(&self) -> Arc<ReputationBook> {
        let guard = self.book.read().unwrap_or_else(|e| e.into_inner());
        Arc::clone(&guard)
    }
}

#[async_trait]
impl ReputationStore for JsonReputationStore {
    async fn snapshot(&self) -> Result<Arc<ReputationBook>, ReputationStoreError> {
        Ok(self.current())
    }

    async fn record_outcome(
        &self,
        question_id: &str,
        domain: ForecastDomain,
        predictions: &[AgentPrediction],
        occurred: bool,
        now: DateTime<Utc>,
    ) -> Result<OutcomeApplied, ReputationStoreError> {
        let _writer = self.write_lock.lock().await;

        let mut next = ReputationBook::clone(&self.current());
        let applied = next.record_outcome(question_id, domain, predictions, occurred, now);
        if applied.duplicate {
            return Ok(applied);
        }

        let bytes = serde_json::to_vec_pretty(&next)
            .map_err(|e| ReputationStoreError::Write(e.to_string()))?;
        write_atomic(&self.path, &bytes)
            .await
            .map_err(|e| ReputationStoreError::Write(format!("{}: {e}", self.path.display())))?;

        *self.book.write().unwrap_or_else(|e| e.into_inner()) = Arc::new(next);
        info!(
            question_id,
            agents = applied.updates.len(),
            path = %self.path.display(),
            "Reputation updated"
        );
        Ok(applied)
    }
}
