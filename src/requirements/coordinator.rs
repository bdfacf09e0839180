//! Installation coordinator
//!
//! Ensures a component's requirements are present. Specifiers are processed
//! in order; satisfied ones are skipped, missing ones are installed one at a
//! time under a single lock, and the first failure aborts the rest.

use super::marker::ProgressMarker;
use super::options::{InstallEnvironment, InstallOptions};
use super::state::{InstallState, RequirementState, StateCache};
use super::Requirement;
use crate::environment::EnvironmentProbe;
use crate::error::{RequisiteError, RequisiteResult};
use crate::package::PackageManager;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Filesystem locations and flags the coordinator works with
#[derive(Debug, Clone)]
pub struct CoordinatorSettings {
    /// Install target used outside a virtual env
    pub deps_dir: PathBuf,
    /// Advisory progress marker
    pub progress_path: PathBuf,
    /// Constraints file candidate; used only if it exists at install time
    pub constraints_file: Option<PathBuf>,
    /// Pass the upgrade flag to the installer
    pub upgrade: bool,
}

impl CoordinatorSettings {
    /// Settings rooted at a configuration directory
    pub fn for_config_dir(config_dir: &Path) -> Self {
        Self {
            deps_dir: config_dir.join("deps"),
            progress_path: config_dir.join(".pip_progress"),
            constraints_file: None,
            upgrade: true,
        }
    }
}

/// The install lock shared by every coordinator in the process
fn process_install_lock() -> Arc<Mutex<()>> {
    static INSTALL_LOCK: OnceLock<Arc<Mutex<()>>> = OnceLock::new();
    Arc::clone(INSTALL_LOCK.get_or_init(|| Arc::new(Mutex::new(()))))
}

/// Ensures requirements, serializing installs with every other coordinator
pub struct RequirementsCoordinator {
    packages: Arc<dyn PackageManager>,
    probe: Arc<dyn EnvironmentProbe>,
    settings: CoordinatorSettings,
    install_lock: Arc<Mutex<()>>,
    states: Arc<StateCache>,
}

impl RequirementsCoordinator {
    /// Create a coordinator over the given collaborators
    pub fn new(
        packages: Arc<dyn PackageManager>,
        probe: Arc<dyn EnvironmentProbe>,
        settings: CoordinatorSettings,
    ) -> Self {
        Self {
            packages,
            probe,
            settings,
            install_lock: process_install_lock(),
            states: Arc::new(StateCache::default()),
        }
    }

    /// Coordinator settings
    pub fn settings(&self) -> &CoordinatorSettings {
        &self.settings
    }

    /// Cached state of a specifier
    pub fn state(&self, requirement: &Requirement) -> InstallState {
        self.states.get(requirement)
    }

    /// Whether a specifier is satisfied, consulting the cache before the installer
    pub async fn is_satisfied(&self, requirement: &Requirement) -> bool {
        self.states.is_installed(requirement) || self.packages.is_installed(requirement).await
    }

    /// Options the next install would use, derived from the current environment
    pub async fn install_options(&self) -> InstallOptions {
        let env = InstallEnvironment::detect(
            self.probe.as_ref(),
            self.settings.constraints_file.as_deref(),
        )
        .await;
        InstallOptions::derive(&env, &self.settings.deps_dir).with_upgrade(self.settings.upgrade)
    }

    /// Ensure every specifier is installed for `component`.
    ///
    /// Fails with [`RequisiteError::RequirementsNotFound`] naming the first
    /// specifier the installer could not install; later specifiers are not
    /// attempted.
    pub async fn ensure_requirements(
        &self,
        component: &str,
        requirements: &[Requirement],
    ) -> RequisiteResult<()> {
        self.ensure_requirements_with_progress(component, requirements, &|_, _| {})
            .await
    }

    /// [`ensure_requirements`](Self::ensure_requirements), reporting each
    /// state transition to `on_state`.
    pub async fn ensure_requirements_with_progress(
        &self,
        component: &str,
        requirements: &[Requirement],
        on_state: &(dyn Fn(&Requirement, RequirementState) + Send + Sync),
    ) -> RequisiteResult<()> {
        debug!(
            "Processing {} requirement(s) for {}",
            requirements.len(),
            component
        );

        for requirement in requirements {
            on_state(requirement, RequirementState::Checking);

            if self.states.is_installed(requirement) {
                debug!("{} already processed", requirement);
                on_state(requirement, RequirementState::Satisfied);
                continue;
            }

            if self.packages.is_installed(requirement).await {
                self.states.set(requirement, InstallState::Installed);
                on_state(requirement, RequirementState::Satisfied);
                continue;
            }

            on_state(requirement, RequirementState::Installing);
            let options = self.install_options().await;
            if self.install(requirement, options).await? {
                on_state(requirement, RequirementState::Installed);
            } else {
                on_state(requirement, RequirementState::Failed);
                warn!(
                    "Not initializing {} because could not install requirement {}",
                    component, requirement
                );
                return Err(RequisiteError::requirement_not_found(
                    component,
                    requirement.as_str(),
                ));
            }
        }

        Ok(())
    }

    /// Install one specifier under the install lock with the progress marker held.
    ///
    /// Returns the installer's verdict. If another task installed the same
    /// specifier while this one waited for the lock, returns `true` without
    /// invoking the installer. The install runs in its own task, so dropping
    /// the returned future does not interrupt an installer already started.
    pub async fn install(
        &self,
        requirement: &Requirement,
        options: InstallOptions,
    ) -> RequisiteResult<bool> {
        let job = InstallJob {
            lock: Arc::clone(&self.install_lock),
            packages: Arc::clone(&self.packages),
            states: Arc::clone(&self.states),
            marker_path: self.settings.progress_path.clone(),
            requirement: requirement.clone(),
            options,
        };

        tokio::spawn(job.run())
            .await
            .map_err(|e| RequisiteError::Internal(format!("install task failed: {}", e)))?
    }
}

/// One install attempt, owned by its own task
struct InstallJob {
    lock: Arc<Mutex<()>>,
    packages: Arc<dyn PackageManager>,
    states: Arc<StateCache>,
    marker_path: PathBuf,
    requirement: Requirement,
    options: InstallOptions,
}

impl InstallJob {
    async fn run(self) -> RequisiteResult<bool> {
        let _guard = self.lock.lock_owned().await;

        if self.states.is_installed(&self.requirement) {
            debug!(
                "{} was installed while waiting for the install lock",
                self.requirement
            );
            return Ok(true);
        }

        // Declared after the lock guard so it is removed before the lock is released
        let _marker = ProgressMarker::create(&self.marker_path).await?;
        debug!(
            "Installing {} with {}",
            self.requirement,
            self.packages.name()
        );

        let installed = self
            .packages
            .install_package(&self.requirement, &self.options)
            .await;
        if installed {
            info!("Installed {}", self.requirement);
            self.states.set(&self.requirement, InstallState::Installed);
        } else {
            self.states.set(&self.requirement, InstallState::Failed);
        }
        Ok(installed)
    }
}
