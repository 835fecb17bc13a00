//! Context snippets from a JSONL file
//!
//! One object per line:
//!
//! ```text
//! {"snippet": "Troops massed near the border", "source": "reuters.com", "timestamp": "2025-03-02T14:00:00Z"}
//! ```
//!
//! The file is re-read on every fetch, so an external collector can keep
//! appending to it.

use async_trait::async_trait;
use chrono::Utc;
use foresight_application::ports::context_provider::{ContextError, ContextProvider};
use foresight_domain::{ContextQuery, ContextSnippet};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub struct JsonlContextProvider {
    path: PathBuf,
}

impl JsonlContextProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Parse every well-formed line; malformed lines are skipped and counted.
fn parse_lines(content: &str) -> (Vec<ContextSnippet>, usize) {
    let mut snippets = Vec::new();
    let mut skipped = 0;
    for line in content.lines().map(str::trim).filter(|l| !l.is_empty()) {
        match serde_json::from_str::<ContextSnippet>(line) {
            Ok(s) if !s.snippet.trim().is_empty() => snippets.push(s),
            _ => skipped += 1,
        }
    }
    (snippets, skipped)
}

#[async_trait]
impl ContextProvider for JsonlContextProvider {
    async fn fetch(
        &self,
        _question: &str,
        query: &ContextQuery,
    ) -> Result<Vec<ContextSnippet>, ContextError> {
        let content = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| ContextError::Unavailable(format!("{}: {e}", self.path.display())))?;

        let (snippets, skipped) = parse_lines(&content);
        if snippets.is_empty() && skipped > 0 {
            return Err(ContextError::Malformed(format!(
                "{}: no readable entries ({skipped} malformed)",
                self.path.display()
            )));
        }
        if skipped > 0 {
            warn!(path = %self.path.display(), skipped, "Skipped malformed context lines");
        }

        let total = snippets.len();
        let selected = query.select(snippets, Utc::now());
        debug!(total, selected = selected.len(), "Context snippets selected");
        Ok(selected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn line(snippet: &str, days_ago: i64) -> String {
        let ts = Utc::now() - Duration::days(days_ago);
        serde_json::json!({"snippet": snippet, "source": "wire", "timestamp": ts}).to_string()
    }

    async fn fetch(content: &str, query: ContextQuery) -> Result<Vec<ContextSnippet>, ContextError> {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("context.jsonl");
        std::fs::write(&path, content).unwrap();
        JsonlContextProvider::new(&path).fetch("q", &query).await
    }

    #[tokio::test]
    async fn test_window_cap_and_order() {
        let content = [
            line("old", 30),
            line("two days", 2),
            line("today", 0),
            line("five days", 5),
        ]
        .join("\n");
        let snippets = fetch(&content, ContextQuery::new(7, 2)).await.unwrap();
        let texts: Vec<_> = snippets.iter().map(|s| s.snippet.as_str()).collect();
        assert_eq!(texts, vec!["today", "two days"]);
    }

    #[tokio::test]
    async fn test_malformed_lines_skipped() {
        let content = format!("{}\nnot json\n\n{}\n", line("a", 1), line("b", 1));
        let snippets = fetch(&content, ContextQuery::default()).await.unwrap();
        assert_eq!(snippets.len(), 2);
    }

    #[tokio::test]
    async fn test_only_malformed_is_error() {
        let err = fetch("garbage\n{\"snippet\": 1}\n", ContextQuery::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ContextError::Malformed(_)));
    }

    #[tokio::test]
    async fn test_empty_file_is_empty_context() {
        assert!(fetch("", ContextQuery::default()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_file_is_unavailable() {
        let provider = JsonlContextProvider::new("/nonexistent/context.jsonl");
        let err = provider.fetch("q", &ContextQuery::default()).await.unwrap_err();
        assert!(matches!(err, ContextError::Unavailable(_)));
    }
}
