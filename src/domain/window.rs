use crate::domain::version::CompatVersion;
use crate::error::{UpdateCompatError, Result};

/// The versions supported by `-compat`, oldest first, current version last
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionWindow {
    versions: Vec<CompatVersion>,
}

impl VersionWindow {
    /// Compute the window keeping the newest `number_of_old_versions` known
    /// versions plus `current`.
    ///
    /// `known` must be sorted oldest first. If it already contains `current`,
    /// that entry has to be the newest one and is set aside before slicing.
    ///
    /// # Returns
    /// * `Ok(VersionWindow)` - window of exactly `number_of_old_versions + 1` versions
    /// * `Err` - if `current` is known but not newest, or too few old versions are known
    pub fn compute(
        known: &[CompatVersion],
        current: CompatVersion,
        number_of_old_versions: usize,
    ) -> Result<Self> {
        let mut old = known;
        if known.contains(&current) {
            match known.last() {
                Some(last) if *last == current => old = &known[..known.len() - 1],
                Some(last) => {
                    return Err(UpdateCompatError::version(format!(
                        "Known version {} is newer than the current version {}",
                        last, current
                    )))
                }
                None => {}
            }
        }

        if old.len() < number_of_old_versions {
            return Err(UpdateCompatError::version(format!(
                "Cannot keep {} old versions: only {} known ({})",
                number_of_old_versions,
                old.len(),
                join_dotted(old)
            )));
        }

        let mut versions = old[old.len() - number_of_old_versions..].to_vec();
        versions.push(current);
        Ok(VersionWindow { versions })
    }

    /// Versions oldest first
    pub fn versions(&self) -> &[CompatVersion] {
        &self.versions
    }

    pub fn len(&self) -> usize {
        self.versions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }

    pub fn contains(&self, version: &CompatVersion) -> bool {
        self.versions.contains(version)
    }

    /// The current version
    pub fn newest(&self) -> Option<CompatVersion> {
        self.versions.last().copied()
    }

    /// Each version paired with its successor in the window
    pub fn successors(&self) -> impl Iterator<Item = (CompatVersion, Option<CompatVersion>)> + '_ {
        self.versions
            .iter()
            .enumerate()
            .map(move |(i, v)| (*v, self.versions.get(i + 1).copied()))
    }

    /// Known versions that fall out of this window, oldest first
    pub fn dropped(&self, known: &[CompatVersion]) -> Vec<CompatVersion> {
        known
            .iter()
            .filter(|v| !self.contains(v))
            .copied()
            .collect()
    }
}

fn join_dotted(versions: &[CompatVersion]) -> String {
    versions
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
