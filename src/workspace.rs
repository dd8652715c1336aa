//! Scratch workspace for downloads and extraction.
//!
//! All intermediate files (the downloaded archive, the extracted tree) live
//! in one temporary directory that is removed when the workspace is
//! dropped, on success and failure alike. Nothing is ever staged inside the
//! final installation directory.

use crate::core::InstallerError;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::debug;

/// A per-run temporary directory, cleaned up on drop.
pub struct Workspace {
    dir: TempDir,
}

impl Workspace {
    /// Create a fresh scratch directory under the system temp location.
    ///
    /// # Errors
    ///
    /// Fails when the system temp directory is not writable.
    pub fn create() -> Result<Self, InstallerError> {
        let dir = tempfile::Builder::new().prefix("awsomarchy-install-").tempdir()?;
        debug!("scratch workspace: {}", dir.path().display());
        Ok(Self { dir })
    }

    /// Root of the scratch directory.
    #[must_use]
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Directory the archive is extracted into. Created on demand.
    ///
    /// # Errors
    ///
    /// Propagates the underlying IO error if the directory cannot be
    /// created.
    pub fn staging_dir(&self) -> Result<PathBuf, InstallerError> {
        let staging = self.dir.path().join("extracted");
        std::fs::create_dir_all(&staging)?;
        Ok(staging)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn workspace_is_removed_on_drop() {
        let workspace = Workspace::create().unwrap();
        let root = workspace.path().to_path_buf();
        let staging = workspace.staging_dir().unwrap();
        std::fs::write(staging.join("leftover"), b"x").unwrap();
        assert!(root.exists());

        drop(workspace);
        assert!(!root.exists());
    }

    #[test]
    fn staging_dir_is_inside_workspace() {
        let workspace = Workspace::create().unwrap();
        let staging = workspace.staging_dir().unwrap();
        assert!(staging.starts_with(workspace.path()));
        assert!(staging.is_dir());
    }
}
