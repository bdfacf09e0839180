//! Advisory progress marker
//!
//! An empty file whose existence tells external tooling that an install is
//! running. Exclusion is provided by the coordinator's lock, not by this
//! file. The guard removes the file on drop, so every exit path (success,
//! failure, error, unwinding) cleans it up.

use crate::error::{RequisiteError, RequisiteResult};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, warn};

/// Guard owning the marker file for the duration of one install
#[derive(Debug)]
pub struct ProgressMarker {
    path: PathBuf,
}

impl ProgressMarker {
    /// Create the marker file, creating parent directories as needed
    pub async fn create(path: impl Into<PathBuf>) -> RequisiteResult<Self> {
        let path = path.into();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await.map_err(|e| {
                RequisiteError::io(format!("creating directory {}", parent.display()), e)
            })?;
        }

        fs::write(&path, b"").await.map_err(|e| {
            RequisiteError::io(format!("creating progress marker {}", path.display()), e)
        })?;

        debug!("Created progress marker {}", path.display());
        Ok(Self { path })
    }

    /// Marker file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether an install is in progress according to the marker at `path`
    pub fn is_present(path: &Path) -> bool {
        path.try_exists().unwrap_or(false)
    }
}

impl Drop for ProgressMarker {
    fn drop(&mut self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => debug!("Removed progress marker {}", self.path.display()),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => warn!(
                "Failed to remove progress marker {}: {}",
                self.path.display(),
                e
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn exists_while_held() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join(".pip_progress");

        let marker = ProgressMarker::create(&path).await.unwrap();
        assert!(ProgressMarker::is_present(&path));
        assert_eq!(marker.path(), path);

        drop(marker);
        assert!(!ProgressMarker::is_present(&path));
    }

    #[tokio::test]
    async fn drop_tolerates_external_removal() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(".pip_progress");

        let marker = ProgressMarker::create(&path).await.unwrap();
        std::fs::remove_file(&path).unwrap();
        drop(marker);

        assert!(!ProgressMarker::is_present(&path));
    }

    #[tokio::test]
    async fn removed_when_unwinding() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(".pip_progress");
        let marker = ProgressMarker::create(&path).await.unwrap();

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(move || {
            let _marker = marker;
            panic!("installer blew up");
        }));

        assert!(result.is_err());
        assert!(!ProgressMarker::is_present(&path));
    }

    #[tokio::test]
    async fn create_fails_when_parent_is_a_file() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "").unwrap();

        let err = ProgressMarker::create(blocker.join(".pip_progress"))
            .await
            .unwrap_err();
        assert!(matches!(err, RequisiteError::Io { .. }));
    }
}
