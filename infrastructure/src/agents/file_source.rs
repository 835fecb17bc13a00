//! Agent source that re-reads `[[agents]]` from the config files on every
//! round, so profile edits take effect without a restart.

use crate::config::ConfigLoader;
use async_trait::async_trait;
use foresight_application::ports::agent_source::{AgentSource, AgentSourceError};
use foresight_domain::AgentRegistry;
use std::path::PathBuf;
use tracing::debug;

/// Built-in corps overlaid with the `[[agents]]` of the given config files.
pub struct FileAgentSource {
    /// Config files, lowest priority first
    files: Vec<PathBuf>,
}

impl FileAgentSource {
    pub fn new(files: Vec<PathBuf>) -> Self {
        Self { files }
    }
}

#[async_trait]
impl AgentSource for FileAgentSource {
    async fn load(&self) -> Result<AgentRegistry, AgentSourceError> {
        let files = self.files.clone();
        let config = tokio::task::spawn_blocking(move || ConfigLoader::load_files(&files))
            .await
            .map_err(|e| AgentSourceError::Read(e.to_string()))?
            .map_err(|e| AgentSourceError::Read(e.to_string()))?;

        let overrides = config.agents.len();
        let registry = AgentRegistry::builtin().with_overrides(config.agents)?;
        debug!(agents = registry.len(), overrides, "Agent registry loaded");
        Ok(registry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use foresight_domain::DomainError;
    use std::fs;

    const OVERRIDE: &str = r#"
[[agents]]
name = "Macro Risk Forecaster"
persona = "You are {name}."
model = "llama3"
base_weight = 2.0

[[agents]]
name = "Grid Analyst"
persona = "You are {name}."
model = "llama3"
base_weight = 1.0
enabled = false
"#;

    #[tokio::test]
    async fn test_no_files_yields_builtin() {
        let registry = FileAgentSource::new(Vec::new()).load().await.unwrap();
        assert_eq!(registry, AgentRegistry::builtin());
    }

    #[tokio::test]
    async fn test_overrides_replace_and_append() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("foresight.toml");
        fs::write(&path, OVERRIDE).unwrap();

        let registry = FileAgentSource::new(vec![path]).load().await.unwrap();
        assert_eq!(registry.len(), AgentRegistry::builtin().len() + 1);
        let macro_risk = registry.get("macro risk forecaster").unwrap();
        assert_eq!(macro_risk.model, "llama3");
        assert_eq!(macro_risk.base_weight, 2.0);
        assert!(!registry.get("Grid Analyst").unwrap().enabled);
    }

    #[tokio::test]
    async fn test_edits_picked_up_between_loads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("foresight.toml");
        fs::write(&path, "").unwrap();
        let source = FileAgentSource::new(vec![path.clone()]);
        assert!(source.load().await.unwrap().get("Grid Analyst").is_none());

        fs::write(&path, OVERRIDE).unwrap();
        assert!(source.load().await.unwrap().get("Grid Analyst").is_some());
    }

    #[tokio::test]
    async fn test_invalid_profile_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("foresight.toml");
        fs::write(
            &path,
            "[[agents]]\nname = \"Bad\"\npersona = \"p\"\nmodel = \"m\"\nbase_weight = -1.0\n",
        )
        .unwrap();

        let err = FileAgentSource::new(vec![path]).load().await.unwrap_err();
        assert!(matches!(
            err,
            AgentSourceError::Invalid(DomainError::InvalidProfile { .. })
        ));
    }

    #[tokio::test]
    async fn test_missing_file_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = FileAgentSource::new(vec![dir.path().join("gone.toml")])
            .load()
            .await
            .unwrap_err();
        assert!(matches!(err, AgentSourceError::Read(_)));
    }
}
