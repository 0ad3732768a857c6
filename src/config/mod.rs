//! User configuration
//!
//! A single TOML file, `<config_dir>/chanko/config.toml` unless `--config`
//! or `CHANKO_CONFIG` points elsewhere. Every key is optional; a missing
//! file means all defaults.

pub mod schema;

pub use schema::Config;

use crate::error::{ChankoError, ChankoResult};
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

/// Reads and writes the chanko config file
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    /// Manager for the per-user config file
    pub fn new() -> Self {
        Self {
            config_path: Self::default_config_path(),
        }
    }

    /// Manager for an explicit `--config` file
    pub fn with_path(path: PathBuf) -> Self {
        Self { config_path: path }
    }

    /// `<config_dir>/chanko/config.toml`, or `./chanko/config.toml` when the
    /// platform has no config directory
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("chanko")
            .join("config.toml")
    }

    /// Load the managed file; absent means defaults
    pub async fn load(&self) -> ChankoResult<Config> {
        match self.load_from_file(&self.config_path).await {
            Err(ChankoError::Io { ref source, .. })
                if source.kind() == io::ErrorKind::NotFound =>
            {
                debug!("No config at {}, using defaults", self.config_path.display());
                Ok(Config::default())
            }
            result => result,
        }
    }

    /// Parse `path` as a chanko config
    pub async fn load_from_file(&self, path: &Path) -> ChankoResult<Config> {
        let content = fs::read_to_string(path)
            .await
            .map_err(|e| ChankoError::io(format!("reading config from {}", path.display()), e))?;

        toml::from_str(&content).map_err(|e| ChankoError::ConfigInvalid {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Write `config` to the managed file, creating its directory
    pub async fn save(&self, config: &Config) -> ChankoResult<()> {
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| ChankoError::ConfigDirCreate {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
        }

        let content = toml::to_string_pretty(config)?;
        fs::write(&self.config_path, content).await.map_err(|e| {
            ChankoError::io(
                format!("writing config to {}", self.config_path.display()),
                e,
            )
        })?;

        info!("Wrote {}", self.config_path.display());
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.config_path
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
    use tempfile::TempDir;

    #[tokio::test]
    async fn load_default_when_missing() {
        let temp = TempDir::new().unwrap();
        let manager = ConfigManager::with_path(temp.path().join("nonexistent.toml"));

        let config = manager.load().await.unwrap();
        assert_eq!(config.general.log_format, "text");
        assert!(!config.arena.lock);
    }

    #[tokio::test]
    async fn save_and_load_roundtrip() {
        let temp = TempDir::new().unwrap();
        let manager = ConfigManager::with_path(temp.path().join("nested").join("config.toml"));

        let mut config = Config::default();
        config.arena.lock = true;
        config.cache.dir = Some(PathBuf::from("/var/cache/chanko"));

        manager.save(&config).await.unwrap();
        let loaded = manager.load().await.unwrap();

        assert!(loaded.arena.lock);
        assert_eq!(loaded.cache.dir, Some(PathBuf::from("/var/cache/chanko")));
    }

    #[tokio::test]
    async fn invalid_toml_reports_path() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        std::fs::write(&path, "[arena\nlock = maybe").unwrap();

        let err = ConfigManager::with_path(path.clone()).load().await.unwrap_err();
        match err {
            ChankoError::ConfigInvalid { path: reported, .. } => assert_eq!(reported, path),
            other => panic!("unexpected error: {other}"),
        }
    }
}
