//! Error types for requisite
//!
//! All modules use `RequisiteResult<T>` as their return type.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for requisite operations
pub type RequisiteResult<T> = Result<T, RequisiteError>;

/// All errors that can occur in requisite
#[derive(Error, Debug)]
pub enum RequisiteError {
    // Requirement errors
    #[error("Requirements for {component} not found: {}", .requirements.join(", "))]
    RequirementsNotFound {
        component: String,
        requirements: Vec<String>,
    },

    #[error("Invalid requirement specifier: {0:?}")]
    InvalidRequirement(String),

    // Component errors
    #[error("Component not found: {domain} (looked in {path})")]
    ComponentNotFound { domain: String, path: PathBuf },

    #[error("Invalid component manifest at {path}: {reason}")]
    ManifestInvalid { path: PathBuf, reason: String },

    #[error("Dependency cycle detected: {}", .chain.join(" -> "))]
    DependencyCycle { chain: Vec<String> },

    // Configuration errors
    #[error("Invalid configuration at {path}: {reason}")]
    ConfigInvalid { path: PathBuf, reason: String },

    #[error("Failed to create config directory {path}: {source}")]
    ConfigDirCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // IO errors
    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    // Process errors
    #[error("Command failed: {command}")]
    CommandFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    // General errors
    #[error("Internal error: {0}")]
    Internal(String),

    #[error("{0}")]
    User(String),
}

impl RequisiteError {
    /// Create an IO error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Create a command failed error
    pub fn command_failed(command: impl Into<String>, source: std::io::Error) -> Self {
        Self::CommandFailed {
            command: command.into(),
            source,
        }
    }

    /// Create a requirements-not-found error for a single failing specifier
    pub fn requirement_not_found(
        component: impl Into<String>,
        requirement: impl Into<String>,
    ) -> Self {
        Self::RequirementsNotFound {
            component: component.into(),
            requirements: vec![requirement.into()],
        }
    }

    /// Check if error is retryable
    ///
    /// A failed install may succeed on a later attempt (network, index
    /// availability); configuration and manifest errors will not.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::RequirementsNotFound { .. } | Self::CommandFailed { .. }
        )
    }

    /// Get actionable hint for the error
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::RequirementsNotFound { .. } => {
                Some("Re-run with -vv to see the installer output")
            }
            Self::CommandFailed { .. } => {
                Some("Check that installer.python points at a Python with pip")
            }
            Self::DependencyCycle { .. } => Some("Remove one of the listed dependencies"),
            Self::ConfigInvalid { .. } => Some("Run: requisite config init --force"),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn requirements_not_found_display() {
        let err = RequisiteError::requirement_not_found("comp", "pkgA==1.0");
        assert_eq!(err.to_string(), "Requirements for comp not found: pkgA==1.0");
    }

    #[test]
    fn dependency_cycle_display() {
        let err = RequisiteError::DependencyCycle {
            chain: vec!["a".into(), "b".into(), "a".into()],
        };
        assert!(err.to_string().contains("a -> b -> a"));
    }

    #[test]
    fn error_hint() {
        let err = RequisiteError::requirement_not_found("comp", "x");
        assert_eq!(
            err.hint(),
            Some("Re-run with -vv to see the installer output")
        );
        assert_eq!(RequisiteError::Internal("x".into()).hint(), None);
    }

    #[test]
    fn error_retryable() {
        assert!(RequisiteError::requirement_not_found("comp", "x").is_retryable());
        assert!(!RequisiteError::InvalidRequirement(String::new()).is_retryable());
    }
}
