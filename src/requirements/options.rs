//! Installer option derivation
//!
//! | Condition | Option |
//! |-----------|--------|
//! | virtual env | no `target` (environment default location) |
//! | no virtual env | `target` = dependency directory |
//! | wheels URL set | `find_links` = that URL |
//! | container | `no_cache_dir = true` |
//! | constraints file exists | `constraints` = that path |

use crate::environment::EnvironmentProbe;
use serde::Serialize;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Options handed to the package installer for one specifier
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InstallOptions {
    /// Explicit install location. `None` installs into the active
    /// environment; set only outside a virtual env.
    pub target: Option<PathBuf>,

    /// Constraints file limiting resolution. Set only when the file exists.
    pub constraints: Option<PathBuf>,

    /// Alternate package source. Set only when a wheels URL is configured.
    pub find_links: Option<String>,

    /// Disable the installer's cache. `true` only inside a container.
    pub no_cache_dir: bool,

    /// Upgrade already-present distributions to satisfy the specifier.
    /// Defaults to `false` here; the coordinator sets it from configuration.
    pub upgrade: bool,
}

/// Inputs of the option policy, captured once per install attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstallEnvironment {
    pub virtual_env: bool,
    pub container_env: bool,
    pub wheels_link: Option<String>,
    /// Constraints file, already checked for existence
    pub constraints: Option<PathBuf>,
}

impl InstallEnvironment {
    /// Capture the environment from a probe and a constraints candidate
    pub async fn detect(
        probe: &dyn EnvironmentProbe,
        constraints_candidate: Option<&Path>,
    ) -> Self {
        let virtual_env = probe.is_virtual_env();
        let container_env = probe.is_container_env();
        let wheels_link = probe.wheels_link();

        let constraints = match constraints_candidate {
            Some(path) if is_regular_file(path).await => Some(path.to_path_buf()),
            _ => None,
        };

        let env = Self {
            virtual_env,
            container_env,
            wheels_link,
            constraints,
        };
        debug!("Install environment: {:?}", env);
        env
    }
}

async fn is_regular_file(path: &Path) -> bool {
    match tokio::fs::metadata(path).await {
        Ok(metadata) => metadata.is_file(),
        Err(e) if e.kind() == ErrorKind::NotFound => false,
        Err(e) => {
            debug!("Cannot stat constraints file {}: {}", path.display(), e);
            false
        }
    }
}

impl InstallOptions {
    /// Apply the option policy
    pub fn derive(env: &InstallEnvironment, deps_dir: &Path) -> Self {
        Self {
            target: (!env.virtual_env).then(|| deps_dir.to_path_buf()),
            constraints: env.constraints.clone(),
            find_links: env.wheels_link.clone(),
            no_cache_dir: env.container_env,
            upgrade: false,
        }
    }

    /// Set the upgrade flag
    pub fn with_upgrade(mut self, upgrade: bool) -> Self {
        self.upgrade = upgrade;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHEELS: &str = "https://wheels.example.org/test";

    fn env(virtual_env: bool, container_env: bool, wheels: bool, constraints: bool) -> InstallEnvironment {
        InstallEnvironment {
            virtual_env,
            container_env,
            wheels_link: wheels.then(|| WHEELS.to_string()),
            constraints: constraints.then(|| PathBuf::from("/pkg/package_constraints.txt")),
        }
    }

    #[test]
    fn policy_holds_for_every_combination() {
        let deps = Path::new("/config/deps");

        for bits in 0u8..16 {
            let (venv, container, wheels, constraints) =
                (bits & 1 != 0, bits & 2 != 0, bits & 4 != 0, bits & 8 != 0);
            let opts = InstallOptions::derive(&env(venv, container, wheels, constraints), deps);

            assert_eq!(opts.target.is_none(), venv, "target for {bits:04b}");
            if !venv {
                assert_eq!(opts.target.as_deref(), Some(deps));
            }
            assert_eq!(opts.find_links.as_deref(), wheels.then_some(WHEELS), "find_links for {bits:04b}");
            assert_eq!(opts.no_cache_dir, container, "no_cache_dir for {bits:04b}");
            assert_eq!(opts.constraints.is_some(), constraints, "constraints for {bits:04b}");
        }
    }

    #[test]
    fn bare_host_installs_into_deps_with_cache() {
        let opts = InstallOptions::derive(&env(false, false, false, false), Path::new("/c/deps"));
        assert_eq!(
            opts,
            InstallOptions {
                target: Some(PathBuf::from("/c/deps")),
                ..Default::default()
            }
        );
    }

    #[test]
    fn container_disables_cache() {
        let opts = InstallOptions::derive(&env(true, true, false, false), Path::new("/c/deps"));
        assert!(opts.no_cache_dir);
        assert!(opts.find_links.is_none());
    }

    struct FixedProbe;

    impl EnvironmentProbe for FixedProbe {
        fn is_virtual_env(&self) -> bool {
            true
        }
        fn is_container_env(&self) -> bool {
            false
        }
        fn wheels_link(&self) -> Option<String> {
            None
        }
    }

    #[tokio::test]
    async fn detect_drops_missing_constraints_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let missing = dir.path().join("package_constraints.txt");

        let env = InstallEnvironment::detect(&FixedProbe, Some(&missing)).await;
        assert!(env.constraints.is_none());

        std::fs::write(&missing, "six==1.12.0\n").unwrap();
        let env = InstallEnvironment::detect(&FixedProbe, Some(&missing)).await;
        assert_eq!(env.constraints, Some(missing));
        assert!(env.virtual_env);
    }

    #[tokio::test]
    async fn detect_ignores_directory_named_like_constraints() {
        let dir = tempfile::TempDir::new().unwrap();
        let not_a_file = dir.path().join("package_constraints.txt");
        std::fs::create_dir(&not_a_file).unwrap();

        let env = InstallEnvironment::detect(&FixedProbe, Some(&not_a_file)).await;
        assert!(env.constraints.is_none());
    }
}
