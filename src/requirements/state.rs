//! Per-coordinator installation state

use super::Requirement;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Mutex, PoisonError};

/// Cached outcome for a specifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InstallState {
    /// Not checked yet
    #[default]
    Unknown,
    /// Satisfied, either found or installed by this coordinator
    Installed,
    /// Last install attempt failed. Not sticky: the next call retries.
    Failed,
}

/// Progress of one specifier through `ensure_requirements`
///
/// `Checking -> Satisfied`, or `Checking -> Installing -> Installed | Failed`.
/// `Installing` is the only step during which the install lock is held and
/// the progress marker exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RequirementState {
    Checking,
    Satisfied,
    Installing,
    Installed,
    Failed,
}

impl fmt::Display for RequirementState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Checking => "checking",
            Self::Satisfied => "satisfied",
            Self::Installing => "installing",
            Self::Installed => "installed",
            Self::Failed => "failed",
        };
        write!(f, "{}", name)
    }
}

/// Process-lifetime specifier state, owned by a coordinator
#[derive(Debug, Default)]
pub(crate) struct StateCache {
    states: Mutex<HashMap<Requirement, InstallState>>,
}

impl StateCache {
    pub(crate) fn get(&self, requirement: &Requirement) -> InstallState {
        self.states
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(requirement)
            .copied()
            .unwrap_or_default()
    }

    pub(crate) fn set(&self, requirement: &Requirement, state: InstallState) {
        self.states
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(requirement.clone(), state);
    }

    pub(crate) fn is_installed(&self, requirement: &Requirement) -> bool {
        self.get(requirement) == InstallState::Installed
    }
}
