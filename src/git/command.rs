use crate::error::{Result, UpdateCompatError};
use crate::git::VersionControl;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Stages changes by running the `git` executable in the repository root
pub struct GitCommand {
    root: PathBuf,
}

impl GitCommand {
    /// Create a stager running in `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        GitCommand { root: root.into() }
    }

    fn run(&self, action: &str, path: &Path) -> Result<()> {
        let output = Command::new("git")
            .arg(action)
            .arg(path)
            .current_dir(&self.root)
            .output()
            .map_err(|e| UpdateCompatError::vcs(format!("Failed to run git {}: {}", action, e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(UpdateCompatError::vcs(format!(
                "process returned code {}: {}",
                output.status.code().unwrap_or(-1),
                stderr.trim()
            )));
        }

        Ok(())
    }
}

impl VersionControl for GitCommand {
    fn add(&self, path: &Path) -> Result<()> {
        self.run("add", path)
    }

    fn remove(&self, path: &Path) -> Result<()> {
        self.run("rm", path)
    }
}
