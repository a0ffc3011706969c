//! Documentation index (`doc/stdlib/index-list.html.template`)
//!
//! The index is the authoritative list of known shims: its compat lines give
//! the known versions, and they are rewritten after the anchor line from the
//! new window.

use std::path::{Path, PathBuf};

use regex::Regex;

use crate::domain::version::SHIM_PREFIX;
use crate::domain::{CompatVersion, VersionWindow};
use crate::error::{Result, UpdateCompatError};
use crate::sync::{Artifact, Synchronizer};

/// The index split once into shim lines and everything else
///
/// A shim line is one naming a `Coq*` file under the shim directory.
#[derive(Debug, Clone, PartialEq)]
pub struct DocIndex {
    path: PathBuf,
    shim_dir: String,
    contents: String,
    compat_lines: Vec<String>,
    other_lines: Vec<String>,
}

impl DocIndex {
    /// Partition `contents`, keeping line terminators
    pub fn parse(path: impl Into<PathBuf>, shim_dir: &Path, contents: impl Into<String>) -> Self {
        let shim_dir = index_path(shim_dir);
        let marker = format!("{}/{}", shim_dir, SHIM_PREFIX);
        let contents = contents.into();
        let (compat_lines, other_lines): (Vec<String>, Vec<String>) = contents
            .split_inclusive('\n')
            .map(str::to_string)
            .partition(|line| line.contains(&marker));
        DocIndex {
            path: path.into(),
            shim_dir,
            contents,
            compat_lines,
            other_lines,
        }
    }

    /// Read and partition the index under `root`
    pub fn load(root: &Path, path: &Path, shim_dir: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(root.join(path)).map_err(|e| {
            UpdateCompatError::config(format!("Cannot read {}: {}", path.display(), e))
        })?;
        Ok(Self::parse(path, shim_dir, contents))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn contents(&self) -> &str {
        &self.contents
    }

    /// Versions of the shims listed in the index, oldest first
    pub fn known_versions(&self) -> Result<Vec<CompatVersion>> {
        let shim_re = Regex::new(r"Coq[0-9]+\.v")?;
        let mut versions = Vec::new();
        for line in &self.compat_lines {
            for m in shim_re.find_iter(line) {
                versions.push(CompatVersion::from_shim_name(m.as_str())?);
            }
        }
        versions.sort();
        versions.dedup();
        Ok(versions)
    }

    /// The index listing exactly the shims of `window` after `anchor`
    pub fn render(&self, anchor: &str, window: &VersionWindow) -> Result<String> {
        let others: String = self.other_lines.concat();
        if !others.contains(anchor) {
            return Err(UpdateCompatError::structure(
                &self.path,
                format!("no line '{}'", anchor),
            ));
        }

        let mut listing = vec![anchor.to_string()];
        listing.extend(
            window
                .versions()
                .iter()
                .map(|v| format!("    {}/{}", self.shim_dir, v.shim_file_name())),
        );
        Ok(others.replacen(anchor, &listing.join("\n"), 1))
    }
}

/// `dir` as written in the index, with forward slashes and no trailing one
fn index_path(dir: &Path) -> String {
    let components: Vec<String> = dir
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    components.join("/")
}

/// Synchronize the index with `window`
pub fn update_doc_index(
    sync: &mut Synchronizer,
    index: &DocIndex,
    anchor: &str,
    window: &VersionWindow,
) -> Result<()> {
    let desired = index.render(anchor, window)?;
    let artifact = Artifact::new(index.path(), Some(index.contents().to_string()), desired);
    sync.apply(&artifact)?;
    Ok(())
}
