//! Configuration file handling
//!
//! dcdump reads an optional TOML file; a missing file means defaults. Values
//! are validated on load so a bad file fails before any cache is touched.

pub mod schema;

pub use schema::{Config, LogFormat};

use crate::error::{DumpError, DumpResult};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

/// Loads and writes the config file at a fixed path
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    /// Manager for the per-user config file
    pub fn new() -> Self {
        Self::with_path(Self::default_config_path())
    }

    /// Manager for an explicit file, e.g. from `--config`
    pub fn with_path(path: PathBuf) -> Self {
        Self { config_path: path }
    }

    /// `<config dir>/dcdump/config.toml`
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("dcdump")
            .join("config.toml")
    }

    pub fn path(&self) -> &Path {
        &self.config_path
    }

    /// Read and validate the config file, or return defaults when it is absent
    pub async fn load(&self) -> DumpResult<Config> {
        let content = match fs::read_to_string(&self.config_path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(
                    "No config at {}, using defaults",
                    self.config_path.display()
                );
                return Ok(Config::default());
            }
            Err(e) => {
                return Err(DumpError::io(
                    format!("reading config from {}", self.config_path.display()),
                    e,
                ))
            }
        };

        self.parse(&content)
    }

    fn parse(&self, content: &str) -> DumpResult<Config> {
        let invalid = |reason: String| DumpError::ConfigInvalid {
            path: self.config_path.clone(),
            reason,
        };

        let config: Config = toml::from_str(content).map_err(|e| invalid(e.to_string()))?;
        config.validate().map_err(invalid)?;
        Ok(config)
    }

    /// Write the default config.
    ///
    /// An existing file is kept unless `force` is set; returns whether the
    /// file was written.
    pub async fn init(&self, force: bool) -> DumpResult<bool> {
        if !force && fs::try_exists(&self.config_path).await.unwrap_or(false) {
            return Ok(false);
        }
        self.save(&Config::default()).await?;
        Ok(true)
    }

    /// Write `config`, creating the parent directory if needed
    pub async fn save(&self, config: &Config) -> DumpResult<()> {
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| DumpError::ConfigDirCreate {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
        }

        let content = toml::to_string_pretty(config)?;
        fs::write(&self.config_path, content)
            .await
            .map_err(|e| {
                DumpError::io(
                    format!("writing config to {}", self.config_path.display()),
                    e,
                )
            })?;

        info!("Configuration saved to {}", self.config_path.display());
        Ok(())
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dump::ExtractMode;
    use tempfile::TempDir;

    fn manager_in(temp: &TempDir) -> ConfigManager {
        ConfigManager::with_path(temp.path().join("nested").join("config.toml"))
    }

    #[tokio::test]
    async fn load_default_when_missing() {
        let temp = TempDir::new().unwrap();
        let config = manager_in(&temp).load().await.unwrap();
        assert_eq!(config.dump.output_dir, PathBuf::from("dump"));
    }

    #[tokio::test]
    async fn save_and_load_roundtrip() {
        let temp = TempDir::new().unwrap();
        let manager = manager_in(&temp);

        let mut config = Config::default();
        config.general.log_format = LogFormat::Json;
        config.dump.extract = ExtractMode::Always;
        config.dump.jobs = 3;

        manager.save(&config).await.unwrap();
        let loaded = manager.load().await.unwrap();

        assert_eq!(loaded.general.log_format, LogFormat::Json);
        assert_eq!(loaded.dump.extract, ExtractMode::Always);
        assert_eq!(loaded.dump.jobs, 3);
    }

    #[tokio::test]
    async fn init_keeps_existing_file() {
        let temp = TempDir::new().unwrap();
        let manager = manager_in(&temp);

        assert!(manager.init(false).await.unwrap());
        std::fs::write(manager.path(), "[dump]\njobs = 7\n").unwrap();

        assert!(!manager.init(false).await.unwrap());
        assert_eq!(manager.load().await.unwrap().dump.jobs, 7);

        assert!(manager.init(true).await.unwrap());
        assert_ne!(
            std::fs::read_to_string(manager.path()).unwrap(),
            "[dump]\njobs = 7\n"
        );
    }

    #[tokio::test]
    async fn wrong_type_is_invalid() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        std::fs::write(&path, "[dump]\njobs = \"many\"\n").unwrap();

        let err = ConfigManager::with_path(path.clone()).load().await.unwrap_err();
        assert!(matches!(err, DumpError::ConfigInvalid { path: p, .. } if p == path));
    }

    #[tokio::test]
    async fn misspelled_log_format_is_invalid() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        std::fs::write(&path, "[general]\nlog_format = \"jsno\"\n").unwrap();

        let err = ConfigManager::with_path(path).load().await.unwrap_err();
        assert!(matches!(err, DumpError::ConfigInvalid { .. }));
        assert!(err.hint().is_some());
    }

    #[tokio::test]
    async fn zero_jobs_is_invalid() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        std::fs::write(&path, "[dump]\njobs = 0\n").unwrap();

        let err = ConfigManager::with_path(path).load().await.unwrap_err();
        match err {
            DumpError::ConfigInvalid { reason, .. } => assert!(reason.contains("dump.jobs")),
            other => panic!("expected ConfigInvalid, got {other:?}"),
        }
    }
}
