//! Infrastructure layer for foresight
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod agents;
pub mod backend;
pub mod config;
pub mod context;
pub mod logging;
pub mod storage;

// Re-export commonly used types
pub use agents::FileAgentSource;
pub use backend::OllamaBackend;
pub use config::{ConfigLoader, ConfigValidationError, FileConfig};
pub use context::JsonlContextProvider;
pub use logging::JsonlRoundLogger;
pub use storage::{JsonReportRepository, JsonReputationStore};
