//! Configuration file loader with multi-source merging

use super::file_config::FileConfig;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::path::{Path, PathBuf};

const PROJECT_FILES: [&str; 2] = ["foresight.toml", ".foresight.toml"];
const ENV_PREFIX: &str = "FORESIGHT_";

/// Configuration loader that handles file discovery and merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from all sources with proper priority
    pub fn load(config_path: Option<&PathBuf>) -> Result<FileConfig, Box<figment::Error>> {
        let files = Self::sources(config_path);
        Self::figment(&files)?
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .map_err(Box::new)
    }

    /// Load only the given files, lowest priority first, without the
    /// environment.
    pub fn load_files(files: &[PathBuf]) -> Result<FileConfig, Box<figment::Error>> {
        Self::figment(files)?.extract().map_err(Box::new)
    }

    /// Load only default configuration (for --no-config)
    pub fn load_defaults() -> FileConfig {
        FileConfig::default()
    }

    /// Existing config files, lowest priority first.
    ///
    /// An explicit path is always included so a missing file surfaces as a
    /// load error instead of being skipped silently.
    pub fn sources(config_path: Option<&PathBuf>) -> Vec<PathBuf> {
        let mut files = Vec::new();
        if let Some(global) = Self::global_config_path() {
            if global.exists() {
                files.push(global);
            }
        }
        if let Some(project) = Self::project_config_path() {
            files.push(project);
        }
        if let Some(path) = config_path {
            files.push(path.clone());
        }
        files
    }

    /// Get the global config file path
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("foresight").join("config.toml"))
    }

    /// Get the project-level config file path (if it exists)
    pub fn project_config_path() -> Option<PathBuf> {
        Self::project_config_in(Path::new("."))
    }

    fn project_config_in(dir: &Path) -> Option<PathBuf> {
        PROJECT_FILES
            .iter()
            .map(|name| dir.join(name))
            .find(|path| path.exists())
    }

    /// Defaults plus every file; figment treats a missing file as empty,
    /// so absence is checked here.
    fn figment(files: &[PathBuf]) -> Result<Figment, Box<figment::Error>> {
        let mut figment = Figment::new().merge(Serialized::defaults(FileConfig::default()));
        for path in files {
            if !path.exists() {
                return Err(Box::new(figment::Error::from(format!(
                    "config file not found: {}",
                    path.display()
                ))));
            }
            figment = figment.merge(Toml::file(path));
        }
        Ok(figment)
    }

    /// Print the config file locations being used (for debugging)
    pub fn print_config_sources() {
        println!("Configuration sources (in priority order):");
        println!("  [ENV  ] Variables: {ENV_PREFIX}<SECTION>__<KEY>");

        match Self::project_config_path() {
            Some(path) => println!("  [FOUND] Project: {}", path.display()),
            None => println!("  [     ] Project: ./foresight.toml or ./.foresight.toml"),
        }

        if let Some(path) = Self::global_config_path() {
            let mark = if path.exists() { "FOUND" } else { "     " };
            println!("  [{mark}] Global:  {}", path.display());
        }

        println!("  [     ] Default: built-in defaults");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_load_defaults() {
        let config = ConfigLoader::load_defaults();
        assert!(config.agents.is_empty());
        assert!(config.quality.requery_enabled);
    }

    #[test]
    fn test_global_config_path_returns_some() {
        let path = ConfigLoader::global_config_path().unwrap();
        assert!(path.to_string_lossy().contains("foresight"));
    }

    #[test]
    fn test_later_files_override_earlier() {
        let dir = tempfile::tempdir().unwrap();
        let global = dir.path().join("global.toml");
        let project = dir.path().join("project.toml");
        fs::write(&global, "[round]\ncall_timeout_secs = 10\nround_deadline_secs = 50\n").unwrap();
        fs::write(&project, "[round]\ncall_timeout_secs = 20\n").unwrap();

        let config = ConfigLoader::load_files(&[global, project]).unwrap();
        assert_eq!(config.round.call_timeout_secs, 20);
        assert_eq!(config.round.round_deadline_secs, 50);
        assert_eq!(config.gateway.max_retries, 3);
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(ConfigLoader::load_files(&[missing]).is_err());
    }

    #[test]
    fn test_malformed_value_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        fs::write(&path, "[gateway]\nmax_retries = \"many\"\n").unwrap();
        assert!(ConfigLoader::load_files(&[path]).is_err());
    }

    #[test]
    fn test_project_file_discovery() {
        let dir = tempfile::tempdir().unwrap();
        assert!(ConfigLoader::project_config_in(dir.path()).is_none());

        fs::write(dir.path().join(".foresight.toml"), "").unwrap();
        let found = ConfigLoader::project_config_in(dir.path()).unwrap();
        assert!(found.ends_with(".foresight.toml"));

        fs::write(dir.path().join("foresight.toml"), "").unwrap();
        let found = ConfigLoader::project_config_in(dir.path()).unwrap();
        assert!(found.ends_with("foresight.toml"));
        assert!(!found.ends_with(".foresight.toml"));
    }
}
