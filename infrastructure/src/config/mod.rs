//! Configuration file loading for foresight
//!
//! The priority order (highest to lowest):
//!
//! 1. Environment variables prefixed `FORESIGHT_` (`__` separates sections)
//! 2. `--config <path>` specified file
//! 3. Project root: `./foresight.toml` or `./.foresight.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/foresight/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigValidationError, FileBackendConfig, FileConfig, FileConsensusConfig, FileContextConfig,
    FileGatewayConfig, FileOutputConfig, FileQualityConfig, FileReputationConfig,
    FileRoundConfig, FileStorageConfig, data_dir,
};
pub use loader::ConfigLoader;
