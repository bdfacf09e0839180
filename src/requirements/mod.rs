//! Requirement installation
//!
//! Makes sure the packages a component needs are present before the
//! component is set up.
//!
//! # Install flow
//!
//! | Step | Lock held | Marker exists |
//! |------|-----------|---------------|
//! | Checking | no | no |
//! | Satisfied | no | no |
//! | Installing | yes | yes |
//! | Installed / Failed | no | no |
//!
//! The lock is a process-wide async mutex shared by every
//! [`RequirementsCoordinator`]. The marker file is advisory and only
//! exists for external observers.

mod coordinator;
mod marker;
mod options;
mod specifier;
mod state;

pub use coordinator::{CoordinatorSettings, RequirementsCoordinator};
pub use marker::ProgressMarker;
pub use options::{InstallEnvironment, InstallOptions};
pub use specifier::{compare_versions, ParsedRequirement, Requirement, VersionClause};
pub use state::{InstallState, RequirementState};

use crate::config::Config;
use crate::environment::{EnvironmentProbe, SystemProbe};
use crate::package::PipInstaller;
use std::sync::Arc;

/// Build a pip-backed coordinator from configuration
pub fn create_coordinator(config: &Config) -> RequirementsCoordinator {
    let probe = SystemProbe::new(config.installer.wheels_env.clone());
    let settings = CoordinatorSettings {
        deps_dir: config.deps_path(),
        progress_path: config.progress_path(),
        constraints_file: config.constraints_path(),
        upgrade: config.installer.upgrade,
    };

    // Outside a venv, installs land in the deps user base; inspect there too
    let user_base = (!probe.is_virtual_env()).then(|| settings.deps_dir.clone());
    let packages = PipInstaller::new(config.installer.python.clone()).with_user_base(user_base);

    RequirementsCoordinator::new(Arc::new(packages), Arc::new(probe), settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn coordinator_settings_follow_config() {
        let mut config = Config::default();
        config.general.config_dir = Some(PathBuf::from("/srv/requisite"));
        config.installer.upgrade = false;

        let coordinator = create_coordinator(&config);
        let settings = coordinator.settings();

        assert_eq!(settings.deps_dir, PathBuf::from("/srv/requisite/deps"));
        assert_eq!(
            settings.progress_path,
            PathBuf::from("/srv/requisite/.pip_progress")
        );
        assert!(!settings.upgrade);
    }
}
