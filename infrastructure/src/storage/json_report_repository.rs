//! One JSON file per report, named after the question id.

use super::write_atomic;
use async_trait::async_trait;
use foresight_application::ports::report_repository::{ReportRepository, ReportRepositoryError};
use foresight_domain::Report;
use std::path::{Path, PathBuf};
use tracing::debug;

pub struct JsonReportRepository {
    dir: PathBuf,
}

impl JsonReportRepository {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File for `question_id`, or `None` if the id could escape the directory.
    fn path_for(&self, question_id: &str) -> Option<PathBuf> {
        let valid = !question_id.is_empty()
            && question_id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        valid.then(|| self.dir.join(format!("{question_id}.json")))
    }
}

#[async_trait]
impl ReportRepository for JsonReportRepository {
    async fn save(&self, report: &Report) -> Result<(), ReportRepositoryError> {
        let save_error = |reason: String| ReportRepositoryError::Save {
            question_id: report.question_id.clone(),
            reason,
        };
        let path = self
            .path_for(&report.question_id)
            .ok_or_else(|| save_error("invalid question id".to_string()))?;
        let bytes = serde_json::to_vec_pretty(report).map_err(|e| save_error(e.to_string()))?;
        write_atomic(&path, &bytes)
            .await
            .map_err(|e| save_error(e.to_string()))?;
        debug!(path = %path.display(), "Report saved");
        Ok(())
    }

    async fn load(&self, question_id: &str) -> Result<Option<Report>, ReportRepositoryError> {
        let load_error = |reason: String| ReportRepositoryError::Load {
            question_id: question_id.to_string(),
            reason,
        };
        let path = self
            .path_for(question_id)
            .ok_or_else(|| load_error("invalid question id".to_string()))?;
        match tokio::fs::read(&path).await {
            Ok(bytes) => serde_json::from_slice(&bytes)
                .map(Some)
                .map_err(|e| load_error(e.to_string())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(load_error(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use foresight_domain::{
        AgentProfile, AgentResponse, AttemptStatus, ConsensusParams, DomainClassification,
        NeutralPerformance, QualityScore, QualitySummary, RoundMetrics, RoundTiming,
        ScoredResponse, aggregate,
    };
    use foresight_domain::quality::DimensionScores;
    use foresight_domain::report::question_id;

    fn report() -> Report {
        let mut response = AgentResponse::success("a", "m", 0, "raw", "analysis", 0.7, 0.8, 12, false);
        response.status = AttemptStatus::Final;
        let quality = QualityScore {
            dimensions: DimensionScores::default(),
            penalty: 0.0,
            depth_score: 0.7,
            red_flags: Vec::new(),
            needs_requery: false,
            follow_up_questions: Vec::new(),
        };
        let responses = vec![ScoredResponse::new(response, Some(quality))];
        let classification = DomainClassification::general();
        let aggregation = aggregate(
            &responses,
            &[AgentProfile::new("a", "p", "m", 1.0)],
            &classification,
            &NeutralPerformance,
            &ConsensusParams::default(),
        )
        .unwrap();
        let now = Utc::now();
        Report::assemble(
            question_id("Will it rain?", now),
            "Will it rain?".to_string(),
            classification,
            responses,
            aggregation,
            QualitySummary::default(),
            RoundTiming {
                started_at: now,
                finished_at: now,
                total_elapsed_ms: 12,
                dispatch_elapsed_ms: 12,
                requery_elapsed_ms: 0,
            },
            RoundMetrics::default(),
        )
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let repo = JsonReportRepository::new(dir.path().join("reports"));
        let report = report();
        repo.save(&report).await.unwrap();

        let loaded = repo.load(&report.question_id).await.unwrap().unwrap();
        assert_eq!(loaded, report);
    }

    #[tokio::test]
    async fn test_unknown_id_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let repo = JsonReportRepository::new(dir.path());
        assert!(repo.load("abc_20260101T000000Z").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_path_traversal_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let repo = JsonReportRepository::new(dir.path());
        let err = repo.load("../etc/passwd").await.unwrap_err();
        assert!(matches!(err, ReportRepositoryError::Load { .. }));
    }

    #[tokio::test]
    async fn test_corrupt_report_is_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("q1.json"), "[]").unwrap();
        let repo = JsonReportRepository::new(dir.path());
        assert!(repo.load("q1").await.is_err());
    }
}
