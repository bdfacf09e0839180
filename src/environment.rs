//! Host environment introspection
//!
//! Answers the questions the install option policy depends on: are we in a
//! virtual environment, are we in a container, and was a wheels index
//! supplied. Detection errors never propagate; an unreadable probe counts as
//! "no".

use std::path::{Path, PathBuf};
use tracing::debug;

/// Environment variables that indicate an active Python virtual environment
const VIRTUAL_ENV_VARS: &[&str] = &["VIRTUAL_ENV", "CONDA_PREFIX"];

/// Files whose presence indicates a container (Docker, Podman)
const CONTAINER_MARKERS: &[&str] = &["/.dockerenv", "/run/.containerenv"];

/// Environment introspection used to derive installer options
pub trait EnvironmentProbe: Send + Sync {
    /// Running inside an isolated virtual environment
    fn is_virtual_env(&self) -> bool;

    /// Running inside a container
    fn is_container_env(&self) -> bool;

    /// Externally supplied wheel/package index URL, if any
    fn wheels_link(&self) -> Option<String>;
}

/// Probe backed by the real process environment and filesystem
#[derive(Debug, Clone)]
pub struct SystemProbe {
    wheels_env: String,
    container_markers: Vec<PathBuf>,
}

impl SystemProbe {
    /// Create a probe reading the wheels URL from `wheels_env`
    pub fn new(wheels_env: impl Into<String>) -> Self {
        Self {
            wheels_env: wheels_env.into(),
            container_markers: CONTAINER_MARKERS.iter().map(PathBuf::from).collect(),
        }
    }

    /// Override the container marker files (for testing)
    pub fn with_container_markers(mut self, markers: Vec<PathBuf>) -> Self {
        self.container_markers = markers;
        self
    }

    /// Virtual env detection with a custom env var lookup
    pub fn virtual_env_with<F>(env_fn: F) -> bool
    where
        F: Fn(&str) -> Result<String, std::env::VarError>,
    {
        VIRTUAL_ENV_VARS.iter().any(|var| {
            env_fn(var)
                .map(|value| !value.trim().is_empty())
                .unwrap_or(false)
        })
    }

    fn marker_exists(path: &Path) -> bool {
        match path.try_exists() {
            Ok(exists) => exists,
            Err(e) => {
                debug!("Could not probe {}: {}; assuming absent", path.display(), e);
                false
            }
        }
    }
}

impl Default for SystemProbe {
    fn default() -> Self {
        Self::new("WHEELS_LINKS")
    }
}

impl EnvironmentProbe for SystemProbe {
    fn is_virtual_env(&self) -> bool {
        Self::virtual_env_with(|key| std::env::var(key))
    }

    fn is_container_env(&self) -> bool {
        self.container_markers
            .iter()
            .any(|marker| Self::marker_exists(marker))
    }

    fn wheels_link(&self) -> Option<String> {
        std::env::var(&self.wheels_env)
            .ok()
            .filter(|value| !value.trim().is_empty())
    }
}
