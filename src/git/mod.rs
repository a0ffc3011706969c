//! Version control collaborator
//!
//! The synchronizer only ever needs two operations from version control:
//! staging a written file and staging a removal. Both sit behind the
//! [VersionControl] trait so the pipeline can run against a mock in tests.
//!
//! - [command::GitCommand]: shells out to the `git` executable
//! - [mock::MockVersionControl]: records calls, optionally failing them
//!
//! Repository root discovery uses `git2` directly, see [discover_root].

pub mod command;
pub mod mock;

pub use command::GitCommand;
pub use mock::{MockVersionControl, VcsCall};

use crate::error::{Result, UpdateCompatError};
use std::path::{Path, PathBuf};

/// Staging operations used after a file is written or removed
///
/// Paths are relative to the repository root. A failure is reported as an
/// error here; the synchronizer decides to downgrade it to a warning.
pub trait VersionControl: Send + Sync {
    /// Stage the current content of `path` (`git add`)
    fn add(&self, path: &Path) -> Result<()>;

    /// Stage the removal of `path` (`git rm`)
    fn remove(&self, path: &Path) -> Result<()>;
}

/// Find the work tree root of the repository containing `start`
///
/// # Returns
/// * `Ok(PathBuf)` - Root of the work tree
/// * `Err` - If `start` is not inside a git repository or the repository is bare
pub fn discover_root(start: &Path) -> Result<PathBuf> {
    let repo = git2::Repository::discover(start)?;
    repo.workdir()
        .map(Path::to_path_buf)
        .ok_or_else(|| UpdateCompatError::config("Repository has no work tree"))
}
