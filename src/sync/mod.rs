//! Artifact synchronization
//!
//! Every updater computes the content a file should have and hands it to the
//! [Synchronizer], which is the only place that touches the file tree. In
//! [SyncMode::Write] it writes what changed and stages it; in
//! [SyncMode::AssertUnchanged] any change is an error, so a CI job can check
//! that the tree is already up to date.

pub mod diff;

use std::fs;
use std::path::{Path, PathBuf};

use crate::boundary::BoundaryWarning;
use crate::error::{Result, UpdateCompatError};
use crate::git::VersionControl;
use crate::ui;

/// How the synchronizer treats content that differs from the tree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncMode {
    /// Write changed files
    Write,
    /// Fail on the first changed file, never touch the tree
    AssertUnchanged,
}

/// What happened to a single artifact
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Unchanged,
    Written,
    Removed,
}

/// A file with the content it should have
///
/// `existing` is the content read from the tree, or `None` if the file is
/// absent. Paths are relative to the repository root.
#[derive(Debug, Clone, PartialEq)]
pub struct Artifact {
    pub path: PathBuf,
    pub existing: Option<String>,
    pub desired: String,
    drift_message: Option<String>,
}

impl Artifact {
    pub fn new(path: impl Into<PathBuf>, existing: Option<String>, desired: String) -> Self {
        Artifact {
            path: path.into(),
            existing,
            desired,
            drift_message: None,
        }
    }

    /// Replace the default "`<path>` changed!" assert-unchanged message
    pub fn with_drift_message(mut self, message: impl Into<String>) -> Self {
        self.drift_message = Some(message.into());
        self
    }

    pub fn is_changed(&self) -> bool {
        self.existing.as_deref() != Some(self.desired.as_str())
    }
}

/// Applies artifacts to the tree under `root`
pub struct Synchronizer<'a> {
    root: PathBuf,
    mode: SyncMode,
    stage: bool,
    vcs: &'a dyn VersionControl,
    writes: usize,
    removals: usize,
}

impl<'a> Synchronizer<'a> {
    /// # Arguments
    /// * `root` - Repository root every artifact path is relative to
    /// * `mode` - Write or assert-unchanged
    /// * `stage` - Stage writes and removals through `vcs`
    /// * `vcs` - Version control collaborator
    pub fn new(
        root: impl Into<PathBuf>,
        mode: SyncMode,
        stage: bool,
        vcs: &'a dyn VersionControl,
    ) -> Self {
        Synchronizer {
            root: root.into(),
            mode,
            stage,
            vcs,
            writes: 0,
            removals: 0,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn mode(&self) -> SyncMode {
        self.mode
    }

    pub fn is_asserting(&self) -> bool {
        self.mode == SyncMode::AssertUnchanged
    }

    /// Number of files written so far
    pub fn writes(&self) -> usize {
        self.writes
    }

    /// Number of files removed or set aside so far
    pub fn removals(&self) -> usize {
        self.removals
    }

    /// Absolute path of a root-relative path
    pub fn absolute(&self, path: &Path) -> PathBuf {
        self.root.join(path)
    }

    /// Read a root-relative file, `None` if it does not exist
    pub fn read(&self, path: &Path) -> Result<Option<String>> {
        let absolute = self.absolute(path);
        if !absolute.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(absolute)?))
    }

    /// Bring `artifact.path` to `artifact.desired`
    ///
    /// # Returns
    /// * `Ok(Outcome::Unchanged)` - Content already matches
    /// * `Ok(Outcome::Written)` - File was written (write mode only)
    /// * `Err` - Assert-unchanged violation or I/O failure
    pub fn apply(&mut self, artifact: &Artifact) -> Result<Outcome> {
        if !artifact.is_changed() {
            return Ok(Outcome::Unchanged);
        }

        let shown = artifact.path.display().to_string();
        if self.is_asserting() {
            if let Some(existing) = &artifact.existing {
                if let Some(difference) = diff::first_difference(existing, &artifact.desired) {
                    ui::display_drift(existing, &artifact.desired, &difference);
                }
            }
            let message = artifact
                .drift_message
                .clone()
                .unwrap_or_else(|| format!("{} changed!", shown));
            return Err(UpdateCompatError::drift(&artifact.path, message));
        }

        ui::display_status(&format!("Updating {}...", shown));
        let absolute = self.absolute(&artifact.path);
        if let Some(parent) = absolute.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&absolute, &artifact.desired)?;
        self.writes += 1;

        if self.stage {
            self.stage_add(&artifact.path);
        } else if artifact.existing.is_none() {
            ui::display_boundary_warning(&BoundaryWarning::UnstagedNewFile { path: shown });
        }

        Ok(Outcome::Written)
    }

    /// Remove `path` if it exists
    ///
    /// In assert-unchanged mode the existence of the file is the violation.
    pub fn remove_if_exists(&mut self, path: &Path) -> Result<Outcome> {
        let absolute = self.absolute(path);
        if !absolute.exists() {
            return Ok(Outcome::Unchanged);
        }

        let shown = path.display().to_string();
        if self.is_asserting() {
            return Err(UpdateCompatError::drift(
                path,
                format!("{} exists when it should not!", shown),
            ));
        }

        ui::display_status(&format!("Removing {}...", shown));
        fs::remove_file(&absolute)?;
        self.removals += 1;
        if self.stage {
            self.stage_remove(path);
        }

        Ok(Outcome::Removed)
    }

    /// First phase of a soft delete: rename `path` to `path` + `suffix`
    /// and stage the removal of `path`
    ///
    /// In assert-unchanged mode this is always a violation, since the caller
    /// only asks for it when the file is expected to go away.
    pub fn set_aside(&mut self, path: &Path, suffix: &str) -> Result<Outcome> {
        let shown = path.display().to_string();
        if self.is_asserting() {
            return Err(UpdateCompatError::drift(path, format!("{} exists!", shown)));
        }

        let absolute = self.absolute(path);
        if !absolute.exists() {
            ui::display_boundary_warning(&BoundaryWarning::MissingDroppedShim { path: shown });
            return Ok(Outcome::Unchanged);
        }

        ui::display_status(&format!("Removing {}...", shown));
        let mut backup = absolute.clone().into_os_string();
        backup.push(suffix);
        fs::rename(&absolute, PathBuf::from(backup))?;
        self.removals += 1;
        if self.stage {
            self.stage_remove(path);
        }

        Ok(Outcome::Removed)
    }

    /// Delete an untracked file without staging anything
    pub fn discard(&mut self, path: &Path) -> Result<Outcome> {
        if self.is_asserting() {
            return Err(UpdateCompatError::config(
                "Refusing to delete files with --assert-unchanged",
            ));
        }

        let absolute = self.absolute(path);
        if !absolute.exists() {
            return Ok(Outcome::Unchanged);
        }

        ui::display_status(&format!("Deleting {}...", path.display()));
        fs::remove_file(absolute)?;
        self.removals += 1;
        Ok(Outcome::Removed)
    }

    fn stage_add(&self, path: &Path) {
        ui::display_status(&format!("Running 'git add {}'...", path.display()));
        if let Err(e) = self.vcs.add(path) {
            self.warn_staging("add", path, e);
        }
    }

    fn stage_remove(&self, path: &Path) {
        ui::display_status(&format!("Running 'git rm {}'...", path.display()));
        if let Err(e) = self.vcs.remove(path) {
            self.warn_staging("rm", path, e);
        }
    }

    fn warn_staging(&self, action: &str, path: &Path, error: UpdateCompatError) {
        ui::display_boundary_warning(&BoundaryWarning::StagingFailed {
            action: action.to_string(),
            path: path.display().to_string(),
            reason: error.to_string(),
        });
    }
}
