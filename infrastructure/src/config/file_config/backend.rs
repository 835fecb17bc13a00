//! Backend configuration from TOML (`[backend]` section)

use crate::backend::ollama::DEFAULT_BASE_URL;
use foresight_domain::{ConfigIssue, ConfigIssueCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Generation server settings.
///
/// ```toml
/// [backend]
/// base_url = "http://localhost:11434"
/// api_key = "secret"
/// connect_timeout_secs = 10
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileBackendConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    /// TCP connect timeout; the per-call timeout lives in `[round]`
    pub connect_timeout_secs: u64,
}

impl Default for FileBackendConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            connect_timeout_secs: 10,
        }
    }
}

impl FileBackendConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub(super) fn validate(&self, issues: &mut Vec<ConfigIssue>) {
        let url = self.base_url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::InvalidBackendUrl,
                format!("backend.base_url must be http(s), got '{}'", self.base_url),
            ));
        }
        if self.connect_timeout_secs == 0 {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::ZeroDuration,
                "backend.connect_timeout_secs cannot be 0",
            ));
        }
    }
}
