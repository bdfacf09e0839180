//! pip-backed package manager
//!
//! Installs with `<python> -m pip install --quiet <spec>` and inspects with
//! `<python> -m pip show <name>`. Installs outside a virtual env go to a
//! user base (`--user` + `PYTHONUSERBASE`), which is also where `show`
//! looks when a user base is configured.

use super::{output_tail, stream_child_output, PackageManager};
use crate::error::{RequisiteError, RequisiteResult};
use crate::requirements::{InstallOptions, Requirement};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, error, info, warn};

/// Package manager driving pip through a Python interpreter
#[derive(Debug, Clone)]
pub struct PipInstaller {
    python: String,
    user_base: Option<PathBuf>,
}

impl PipInstaller {
    /// Create an installer using the given interpreter
    pub fn new(python: impl Into<String>) -> Self {
        Self {
            python: python.into(),
            user_base: None,
        }
    }

    /// Inspect packages installed under a user base (the deps directory)
    pub fn with_user_base(mut self, user_base: Option<PathBuf>) -> Self {
        self.user_base = user_base;
        self
    }

    /// Interpreter used to run pip
    pub fn python(&self) -> &str {
        &self.python
    }

    /// Build the `pip install` arguments and environment for one specifier
    pub fn install_command(
        requirement: &Requirement,
        options: &InstallOptions,
    ) -> (Vec<String>, Vec<(String, PathBuf)>) {
        let mut args: Vec<String> = ["-m", "pip", "install", "--quiet", requirement.as_str()]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let mut env = Vec::new();

        if options.no_cache_dir {
            args.push("--no-cache-dir".to_string());
        }
        if options.upgrade {
            args.push("--upgrade".to_string());
        }
        if let Some(ref constraints) = options.constraints {
            args.push("--constraint".to_string());
            args.push(constraints.display().to_string());
        }
        if let Some(ref find_links) = options.find_links {
            args.push("--find-links".to_string());
            args.push(find_links.clone());
            args.push("--prefer-binary".to_string());
        }
        if let Some(ref target) = options.target {
            args.push("--user".to_string());
            env.push(("PYTHONUSERBASE".to_string(), absolute(target)));
            if !cfg!(windows) {
                // --user conflicts with a distutils prefix setting
                args.push("--prefix=".to_string());
            }
        }

        (args, env)
    }

    async fn installed_version(&self, name: &str) -> RequisiteResult<Option<String>> {
        let mut command = Command::new(&self.python);
        command
            .args(["-m", "pip", "show", name])
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null());
        if let Some(ref base) = self.user_base {
            command.env("PYTHONUSERBASE", absolute(base));
        }

        let output = command
            .output()
            .await
            .map_err(|e| {
                RequisiteError::command_failed(format!("{} -m pip show {}", self.python, name), e)
            })?;

        if !output.status.success() {
            return Ok(None);
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        Ok(stdout
            .lines()
            .find_map(|line| line.strip_prefix("Version:"))
            .map(|v| v.trim().to_string()))
    }
}

impl Default for PipInstaller {
    fn default() -> Self {
        Self::new("python3")
    }
}

fn absolute(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}

#[async_trait]
impl PackageManager for PipInstaller {
    async fn is_installed(&self, requirement: &Requirement) -> bool {
        let parsed = match requirement.parse() {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!("{}; treating as not installed", e);
                return false;
            }
        };

        match self.installed_version(&parsed.name).await {
            Ok(Some(version)) => {
                let satisfied = parsed.matches(&version);
                debug!(
                    "{} installed at {} ({})",
                    parsed.name,
                    version,
                    if satisfied { "satisfied" } else { "unsatisfied" }
                );
                satisfied
            }
            Ok(None) => {
                debug!("{} is not installed", parsed.name);
                false
            }
            Err(e) => {
                warn!("Could not inspect {}: {}", parsed.name, e);
                false
            }
        }
    }

    async fn install_package(&self, requirement: &Requirement, options: &InstallOptions) -> bool {
        let (args, env) = Self::install_command(requirement, options);
        info!("Attempting install of {}", requirement);
        debug!("Executing: {} {:?}", self.python, args);

        let mut command = Command::new(&self.python);
        command
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        for (key, value) in &env {
            command.env(key, value);
        }

        let mut child = match command.spawn() {
            Ok(child) => child,
            Err(e) => {
                error!(
                    "{}",
                    RequisiteError::command_failed(format!("{} -m pip install", self.python), e)
                );
                return false;
            }
        };

        let on_output = |line: &str| debug!(target: "requisite::pip", "{}", line);
        let output = stream_child_output(&mut child, &on_output).await;

        match child.wait().await {
            Ok(status) if status.success() => true,
            Ok(status) => {
                error!(
                    "Unable to install package {} ({}):\n{}",
                    requirement,
                    status,
                    output_tail(&output)
                );
                false
            }
            Err(e) => {
                error!("Waiting for pip failed for {}: {}", requirement, e);
                false
            }
        }
    }

    fn name(&self) -> &'static str {
        "pip"
    }
}
