//! Configuration management for requisite

pub mod schema;

pub use schema::Config;

use crate::error::{RequisiteError, RequisiteResult};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

/// Name of the constraints file looked up next to the running executable
pub const CONSTRAINT_FILE: &str = "package_constraints.txt";

/// Configuration manager
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    /// Create a new config manager with default path
    pub fn new() -> Self {
        Self {
            config_path: Self::default_config_path(),
        }
    }

    /// Create a config manager with a custom path
    pub fn with_path(path: PathBuf) -> Self {
        Self { config_path: path }
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("requisite")
            .join("config.toml")
    }

    /// Get the default configuration directory (deps and progress marker)
    pub fn default_config_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("requisite")
    }

    /// Load configuration, falling back to defaults if the file is missing
    pub async fn load(&self) -> RequisiteResult<Config> {
        if !self.config_path.exists() {
            debug!("Config file not found, using defaults");
            return Ok(Config::default());
        }

        self.load_from_file(&self.config_path).await
    }

    /// Load configuration from a specific file
    pub async fn load_from_file(&self, path: &Path) -> RequisiteResult<Config> {
        let content = fs::read_to_string(path).await.map_err(|e| {
            RequisiteError::io(format!("reading config from {}", path.display()), e)
        })?;

        toml::from_str(&content).map_err(|e| RequisiteError::ConfigInvalid {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Save configuration to file
    pub async fn save(&self, config: &Config) -> RequisiteResult<()> {
        self.ensure_config_dir().await?;

        let content = toml::to_string_pretty(config)?;
        fs::write(&self.config_path, content).await.map_err(|e| {
            RequisiteError::io(
                format!("writing config to {}", self.config_path.display()),
                e,
            )
        })?;

        info!("Configuration saved to {}", self.config_path.display());
        Ok(())
    }

    async fn ensure_config_dir(&self) -> RequisiteResult<()> {
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| RequisiteError::ConfigDirCreate {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
        }
        Ok(())
    }

    /// Get the config file path
    pub fn path(&self) -> &Path {
        &self.config_path
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    /// Directory holding `deps/` and the progress marker
    pub fn config_dir(&self) -> PathBuf {
        self.general
            .config_dir
            .clone()
            .unwrap_or_else(ConfigManager::default_config_dir)
    }

    /// Resolve a path relative to the config dir
    pub fn path(&self, relative: impl AsRef<Path>) -> PathBuf {
        self.config_dir().join(relative)
    }

    /// Dependency directory used for installs outside a virtual env
    pub fn deps_path(&self) -> PathBuf {
        self.path(&self.installer.deps_dir)
    }

    /// Advisory progress marker path
    pub fn progress_path(&self) -> PathBuf {
        self.path(&self.installer.progress_file)
    }

    /// Constraints file candidate: the configured override, or the file
    /// next to the running executable.
    pub fn constraints_path(&self) -> Option<PathBuf> {
        if let Some(ref path) = self.installer.constraints_file {
            return Some(path.clone());
        }

        let exe = std::env::current_exe().ok()?;
        exe.parent().map(|dir| dir.join(CONSTRAINT_FILE))
    }

    /// Directory of component manifests
    pub fn components_dir(&self) -> PathBuf {
        self.components
            .dir
            .clone()
            .unwrap_or_else(|| self.path("components"))
    }
}
