//! Configuration schema for requisite
//!
//! Configuration is stored at `~/.config/requisite/config.toml`

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,

    /// Package installer settings
    pub installer: InstallerConfig,

    /// Component manifest settings
    pub components: ComponentsConfig,
}

/// General application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Enable verbose logging
    pub verbose: bool,

    /// Log format: "text" or "json"
    pub log_format: String,

    /// Directory holding the dependency directory and the progress marker.
    /// Defaults to the platform data directory.
    pub config_dir: Option<PathBuf>,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            verbose: false,
            log_format: "text".to_string(),
            config_dir: None,
        }
    }
}

/// Package installer configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InstallerConfig {
    /// Skip requirement processing entirely
    pub skip: bool,

    /// Python interpreter used to run pip
    pub python: String,

    /// Pass `--upgrade` to pip
    pub upgrade: bool,

    /// Dependency directory, relative to the config dir, used outside virtual envs
    pub deps_dir: String,

    /// Progress marker file name, relative to the config dir
    pub progress_file: String,

    /// Constraints file override. When unset, `package_constraints.txt`
    /// next to the running executable is used if it exists.
    pub constraints_file: Option<PathBuf>,

    /// Environment variable holding the wheels find-links URL
    pub wheels_env: String,
}

impl Default for InstallerConfig {
    fn default() -> Self {
        Self {
            skip: false,
            python: "python3".to_string(),
            upgrade: true,
            deps_dir: "deps".to_string(),
            progress_file: ".pip_progress".to_string(),
            constraints_file: None,
            wheels_env: "WHEELS_LINKS".to_string(),
        }
    }
}

/// Component manifest configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ComponentsConfig {
    /// Directory of `<domain>.toml` manifests. Defaults to `<config_dir>/components`.
    pub dir: Option<PathBuf>,
}
