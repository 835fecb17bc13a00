//! Persistence locations from TOML (`[reputation]`, `[context]`, `[storage]`)
//!
//! Unset paths resolve under the platform data directory
//! (`$XDG_DATA_HOME/foresight` on Linux).

use foresight_domain::context::value_objects::{DEFAULT_LOOKBACK_DAYS, DEFAULT_MAX_ITEMS};
use foresight_domain::{ConfigIssue, ConfigIssueCode, ContextQuery, ReputationPolicy};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root directory for all default data files.
pub fn data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|d| d.join("foresight"))
        .unwrap_or_else(|| PathBuf::from(".foresight"))
}

/// `[reputation]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileReputationConfig {
    pub path: Option<PathBuf>,
    pub recent_window: usize,
    pub shrinkage_floor: u32,
}

impl Default for FileReputationConfig {
    fn default() -> Self {
        let policy = ReputationPolicy::default();
        Self {
            path: None,
            recent_window: policy.recent_window,
            shrinkage_floor: policy.shrinkage_floor,
        }
    }
}

impl FileReputationConfig {
    pub fn resolved_path(&self) -> PathBuf {
        self.path
            .clone()
            .unwrap_or_else(|| data_dir().join("reputation.json"))
    }

    pub fn to_policy(&self) -> ReputationPolicy {
        ReputationPolicy {
            recent_window: self.recent_window,
            shrinkage_floor: self.shrinkage_floor,
        }
    }

    pub(super) fn validate(&self, issues: &mut Vec<ConfigIssue>) {
        if self.recent_window == 0 {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::ZeroDuration,
                "reputation.recent_window cannot be 0",
            ));
        }
    }
}

/// `[context]` section. Without a `path` rounds run with no context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileContextConfig {
    /// JSONL file of `{snippet, source, timestamp}` objects
    pub path: Option<PathBuf>,
    pub lookback_days: u32,
    pub max_items: usize,
}

impl Default for FileContextConfig {
    fn default() -> Self {
        Self {
            path: None,
            lookback_days: DEFAULT_LOOKBACK_DAYS,
            max_items: DEFAULT_MAX_ITEMS,
        }
    }
}

impl FileContextConfig {
    pub fn to_query(&self) -> ContextQuery {
        ContextQuery::new(self.lookback_days, self.max_items)
    }

    pub(super) fn validate(&self, issues: &mut Vec<ConfigIssue>) {
        if self.lookback_days == 0 {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::ZeroDuration,
                "context.lookback_days is 0; only snippets from the current instant qualify",
            ));
        }
    }
}

/// `[storage]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileStorageConfig {
    pub reports_dir: Option<PathBuf>,
    /// Round audit log (JSONL); disabled when unset
    pub audit_log: Option<PathBuf>,
}

impl FileStorageConfig {
    pub fn resolved_reports_dir(&self) -> PathBuf {
        self.reports_dir
            .clone()
            .unwrap_or_else(|| data_dir().join("reports"))
    }
}
