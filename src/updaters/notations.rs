//! Removal of notations kept only for dropped versions
//!
//! A line such as `Notation "x" := y (compat "8.10").` exists only to keep
//! `-compat 8.10` working, so it goes away together with the version.

use std::path::Path;

use regex::Regex;
use walkdir::WalkDir;

use crate::domain::CompatVersion;
use crate::error::Result;
use crate::sync::{Artifact, Synchronizer};

/// Line pattern of a notation or infix tagged with `version`
pub fn compat_notation_pattern(version: CompatVersion) -> Result<Regex> {
    let pattern = format!(
        r#"(?m)^[ \t]*(?:Notation|Infix)[^\n]*?compat "{}"[^\n]*?\n"#,
        regex::escape(&version.dotted())
    );
    Ok(Regex::new(&pattern)?)
}

/// `contents` without the notations tagged with any of `dropped`
pub fn prune_notations(contents: &str, dropped: &[CompatVersion]) -> Result<String> {
    let mut pruned = contents.to_string();
    for version in dropped {
        let re = compat_notation_pattern(*version)?;
        pruned = re.replace_all(&pruned, "").into_owned();
    }
    Ok(pruned)
}

/// Prune every `.v` file under `dir`
///
/// A missing `dir` has nothing to prune.
pub fn update_notations(
    sync: &mut Synchronizer,
    dir: &Path,
    dropped: &[CompatVersion],
) -> Result<()> {
    let root = sync.root().to_path_buf();
    if dropped.is_empty() || !root.join(dir).is_dir() {
        return Ok(());
    }

    for entry in WalkDir::new(root.join(dir))
        .follow_links(false)
        .sort_by(|a, b| a.file_name().cmp(b.file_name()))
    {
        let entry = entry.map_err(std::io::Error::from)?;
        let is_source = entry.path().extension().and_then(|ext| ext.to_str()) == Some("v");
        if !entry.file_type().is_file() || !is_source {
            continue;
        }

        let Ok(relative) = entry.path().strip_prefix(&root) else {
            continue;
        };
        let contents = std::fs::read_to_string(entry.path())?;
        let pruned = prune_notations(&contents, dropped)?;
        if pruned != contents {
            sync.apply(&Artifact::new(relative, Some(contents), pruned))?;
        }
    }

    Ok(())
}
