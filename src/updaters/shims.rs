//! Compatibility shim files (`theories/Compat/CoqXY.v`)
//!
//! Each retained version has a shim made of the shared header, a line naming
//! the version and, unless it is the current version, a `Require Export` of
//! the next newer shim. Existing shims are healed forward rather than
//! regenerated, so anything written below the header survives.

use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::{CompatVersion, VersionWindow};
use crate::error::{Result, UpdateCompatError};
use crate::sync::{Artifact, Synchronizer};

/// Suffix appended to shims of dropped versions
pub const BACKUP_SUFFIX: &str = ".bak";

/// The header shared by every shim, as read from the header file
#[derive(Debug, Clone, PartialEq)]
pub struct ShimHeader {
    text: String,
    source: PathBuf,
}

impl ShimHeader {
    /// # Arguments
    /// * `text` - Header contents
    /// * `source` - Root-relative file the header came from, used in errors
    pub fn new(text: impl Into<String>, source: impl Into<PathBuf>) -> Self {
        ShimHeader {
            text: text.into(),
            source: source.into(),
        }
    }

    /// Read the header file under `root`
    pub fn load(root: &Path, source: &Path) -> Result<Self> {
        let text = fs::read_to_string(root.join(source)).map_err(|e| {
            UpdateCompatError::config(format!("Cannot read header {}: {}", source.display(), e))
        })?;
        Ok(Self::new(text, source))
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Shared header followed by the line naming `version`
    pub fn for_version(&self, version: CompatVersion) -> String {
        format!("{}{}", self.text, version_line(version))
    }

    /// Full contents of a freshly created shim
    pub fn new_shim(&self, version: CompatVersion, next: Option<CompatVersion>) -> String {
        let mut contents = self.for_version(version);
        if let Some(next) = next {
            contents.push_str(&format!("\n{}\n", require_line(next)));
        }
        contents
    }

    /// Heal an existing shim forward
    ///
    /// # Returns
    /// * `Ok(None)` - Shim already requires `next` (or `next` is `None`)
    /// * `Ok(Some(contents))` - Contents with the require line inserted after the header
    /// * `Err` - The header is not intact
    pub fn heal(
        &self,
        path: &Path,
        contents: &str,
        version: CompatVersion,
        next: Option<CompatVersion>,
    ) -> Result<Option<String>> {
        let header = self.for_version(version);
        if !contents.starts_with(&self.text) {
            return Err(UpdateCompatError::structure(
                path,
                format!("header does not match {}", self.source.display()),
            ));
        }
        if !contents.starts_with(&header) {
            return Err(UpdateCompatError::structure(
                path,
                format!("header is missing line {}", version_line(version).trim_matches('\n')),
            ));
        }

        let Some(next) = next else {
            return Ok(None);
        };
        let line = require_line(next);
        if contents.contains(&format!("\n{}\n", line)) {
            return Ok(None);
        }

        let mut healed = contents.to_string();
        if !healed.starts_with(&format!("{}\n", header)) {
            healed = healed.replacen(&header, &format!("{}\n", header), 1);
        }
        healed = healed.replacen(&header, &format!("{}\n{}", header, line), 1);
        Ok(Some(healed))
    }
}

fn version_line(version: CompatVersion) -> String {
    format!(
        "\n(** Compatibility file for making Coq act similar to Coq v{} *)\n",
        version
    )
}

/// `Require Export Coq.Compat.CoqXY.`
pub fn require_line(version: CompatVersion) -> String {
    format!("Require Export {}.", version.shim_module())
}

/// Set aside shims of dropped versions, then create or heal the shim of
/// every version in the window
pub fn update_shims(
    sync: &mut Synchronizer,
    shim_dir: &Path,
    header: &ShimHeader,
    known: &[CompatVersion],
    window: &VersionWindow,
) -> Result<()> {
    for version in window.dropped(known) {
        sync.set_aside(&shim_dir.join(version.shim_file_name()), BACKUP_SUFFIX)?;
    }

    for (version, next) in window.successors() {
        let path = shim_dir.join(version.shim_file_name());
        match sync.read(&path)? {
            None => {
                let message = format!("{} does not exist!", path.display());
                let artifact = Artifact::new(&path, None, header.new_shim(version, next))
                    .with_drift_message(message);
                sync.apply(&artifact)?;
            }
            Some(contents) => {
                if let Some(healed) = header.heal(&path, &contents, version, next)? {
                    let message = format!(
                        "Compat file {} is missing line {}",
                        path.display(),
                        next.map(require_line).unwrap_or_default()
                    );
                    let artifact =
                        Artifact::new(&path, Some(contents), healed).with_drift_message(message);
                    sync.apply(&artifact)?;
                }
            }
        }
    }

    Ok(())
}

/// Second phase of removing dropped shims: delete every `*.v.bak` left in
/// `shim_dir`
///
/// # Returns
/// Number of backups deleted
pub fn purge_backups(sync: &mut Synchronizer, shim_dir: &Path) -> Result<usize> {
    let dir = sync.absolute(shim_dir);
    if !dir.is_dir() {
        return Ok(0);
    }

    let suffix = format!(".v{}", BACKUP_SUFFIX);
    let mut backups: Vec<PathBuf> = fs::read_dir(&dir)?
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_name().to_string_lossy().ends_with(&suffix))
        .map(|entry| shim_dir.join(entry.file_name()))
        .collect();
    backups.sort();

    for backup in &backups {
        sync.discard(backup)?;
    }
    Ok(backups.len())
}
