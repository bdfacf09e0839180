//! Component loading with requirement processing
//!
//! Loads a component's manifest, sets up its dependencies first
//! (depth-first), then ensures its own requirements. Each domain is
//! processed at most once per loader.

use super::manifest::ComponentManifest;
use crate::error::{RequisiteError, RequisiteResult};
use crate::requirements::{Requirement, RequirementState, RequirementsCoordinator};
use futures_util::future::{BoxFuture, FutureExt};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, info};

/// Loads component manifests and ensures their requirements
pub struct ComponentLoader {
    dir: PathBuf,
    coordinator: Arc<RequirementsCoordinator>,
    skip_requirements: bool,
    processed: Mutex<HashSet<String>>,
}

impl ComponentLoader {
    /// Create a loader reading `<dir>/<domain>.toml` manifests
    pub fn new(dir: impl Into<PathBuf>, coordinator: Arc<RequirementsCoordinator>) -> Self {
        Self {
            dir: dir.into(),
            coordinator,
            skip_requirements: false,
            processed: Mutex::new(HashSet::new()),
        }
    }

    /// Load manifests without installing anything
    pub fn with_skip_requirements(mut self, skip: bool) -> Self {
        self.skip_requirements = skip;
        self
    }

    /// Manifest directory
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Load and validate one manifest
    pub async fn load(&self, domain: &str) -> RequisiteResult<ComponentManifest> {
        validate_domain(domain)?;

        let path = self.dir.join(format!("{}.toml", domain));
        let exists = tokio::fs::metadata(&path)
            .await
            .map(|metadata| metadata.is_file())
            .unwrap_or(false);
        if !exists {
            return Err(RequisiteError::ComponentNotFound {
                domain: domain.to_string(),
                path: self.dir.clone(),
            });
        }

        let manifest = ComponentManifest::from_file(&path).await?;
        if manifest.domain() != domain {
            return Err(RequisiteError::ManifestInvalid {
                path,
                reason: format!(
                    "domain {:?} does not match file name {:?}",
                    manifest.domain(),
                    domain
                ),
            });
        }

        // Fail on bad specifiers before anything is installed
        manifest.requirements()?;
        Ok(manifest)
    }

    /// Manifests for `domain` and its transitive dependencies, dependencies first
    pub async fn resolve(&self, domain: &str) -> RequisiteResult<Vec<ComponentManifest>> {
        let mut order = Vec::new();
        self.visit(domain, &mut Vec::new(), &mut HashSet::new(), &mut order)
            .await?;
        Ok(order)
    }

    fn visit<'a>(
        &'a self,
        domain: &'a str,
        chain: &'a mut Vec<String>,
        seen: &'a mut HashSet<String>,
        order: &'a mut Vec<ComponentManifest>,
    ) -> BoxFuture<'a, RequisiteResult<()>> {
        async move {
            if seen.contains(domain) {
                return Ok(());
            }
            if let Some(start) = chain.iter().position(|d| d == domain) {
                let mut cycle = chain[start..].to_vec();
                cycle.push(domain.to_string());
                return Err(RequisiteError::DependencyCycle { chain: cycle });
            }

            chain.push(domain.to_string());
            let manifest = self.load(domain).await?;
            for dependency in &manifest.component.dependencies {
                self.visit(dependency, chain, seen, order).await?;
            }
            chain.pop();

            seen.insert(domain.to_string());
            order.push(manifest);
            Ok(())
        }
        .boxed()
    }

    /// Set up `domain`: its dependencies first, then its own requirements.
    ///
    /// Returns the component's manifest.
    pub async fn ensure(&self, domain: &str) -> RequisiteResult<ComponentManifest> {
        self.ensure_with_progress(domain, &|_, _| {}).await
    }

    /// [`ensure`](Self::ensure), reporting requirement state transitions
    pub async fn ensure_with_progress(
        &self,
        domain: &str,
        on_state: &(dyn Fn(&Requirement, RequirementState) + Send + Sync),
    ) -> RequisiteResult<ComponentManifest> {
        let mut order = self.resolve(domain).await?;

        for manifest in &order {
            if self.is_processed(manifest.domain()) {
                debug!("{} already set up", manifest.domain());
                continue;
            }

            if self.skip_requirements {
                debug!("Skipping requirements for {}", manifest.domain());
            } else {
                let requirements = manifest.requirements()?;
                self.coordinator
                    .ensure_requirements_with_progress(manifest.domain(), &requirements, on_state)
                    .await?;
            }

            self.processed
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .insert(manifest.domain().to_string());
            info!("Set up {}", manifest.display_name());
        }

        order
            .pop()
            .ok_or_else(|| RequisiteError::Internal(format!("no manifest resolved for {}", domain)))
    }

    /// Whether `domain` has been set up by this loader
    pub fn is_processed(&self, domain: &str) -> bool {
        self.processed
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(domain)
    }
}

/// Validate that a domain is safe to use as a file stem.
fn validate_domain(domain: &str) -> RequisiteResult<()> {
    if domain.is_empty() {
        return Err(RequisiteError::User("Component domain cannot be empty".to_string()));
    }
    if !domain
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(RequisiteError::User(format!(
            "Invalid component domain '{}': must contain only alphanumeric characters, hyphens, or underscores",
            domain
        )));
    }
    Ok(())
}
