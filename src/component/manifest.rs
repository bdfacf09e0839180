//! Component manifest parsing
//!
//! Each component has a `<domain>.toml` manifest listing the packages it
//! needs and the components it depends on.

use crate::error::{RequisiteError, RequisiteResult};
use crate::requirements::Requirement;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Parsed component manifest
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentManifest {
    /// Component metadata
    pub component: ComponentMeta,
}

/// `[component]` section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentMeta {
    /// Domain (must match the manifest file stem)
    pub domain: String,

    /// Human-readable name
    #[serde(default)]
    pub name: Option<String>,

    /// Package specifiers, installed in order
    #[serde(default)]
    pub requirements: Vec<String>,

    /// Domains that must be set up first
    #[serde(default)]
    pub dependencies: Vec<String>,
}

impl ComponentManifest {
    /// Parse a manifest from a TOML file on disk
    pub async fn from_file(path: &Path) -> RequisiteResult<Self> {
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            RequisiteError::io(format!("reading component manifest {}", path.display()), e)
        })?;
        Self::parse(&content, path)
    }

    /// Parse a manifest from a TOML string; `path` is used for error reporting
    pub fn parse(content: &str, path: &Path) -> RequisiteResult<Self> {
        toml::from_str(content).map_err(|e| RequisiteError::ManifestInvalid {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Component domain
    pub fn domain(&self) -> &str {
        &self.component.domain
    }

    /// Display name, falling back to the domain
    pub fn display_name(&self) -> &str {
        self.component
            .name
            .as_deref()
            .unwrap_or(&self.component.domain)
    }

    /// Requirement specifiers in declaration order
    pub fn requirements(&self) -> RequisiteResult<Vec<Requirement>> {
        self.component
            .requirements
            .iter()
            .map(|spec| Requirement::new(spec.as_str()))
            .collect()
    }
}
