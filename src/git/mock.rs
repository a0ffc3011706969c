use crate::error::{Result, UpdateCompatError};
use crate::git::VersionControl;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// A staging call recorded by [MockVersionControl]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VcsCall {
    Add(PathBuf),
    Remove(PathBuf),
}

/// Mock version control for testing without a git executable
pub struct MockVersionControl {
    calls: Mutex<Vec<VcsCall>>,
    fail: bool,
}

impl MockVersionControl {
    /// Create a mock whose calls all succeed
    pub fn new() -> Self {
        MockVersionControl {
            calls: Mutex::new(Vec::new()),
            fail: false,
        }
    }

    /// Create a mock whose calls are recorded and then fail
    pub fn failing() -> Self {
        MockVersionControl {
            calls: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    /// Calls received so far, in order
    pub fn calls(&self) -> Vec<VcsCall> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    fn record(&self, call: VcsCall) -> Result<()> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
        if self.fail {
            return Err(UpdateCompatError::vcs("process returned code 1"));
        }
        Ok(())
    }
}

impl Default for MockVersionControl {
    fn default() -> Self {
        Self::new()
    }
}

impl VersionControl for MockVersionControl {
    fn add(&self, path: &Path) -> Result<()> {
        self.record(VcsCall::Add(path.to_path_buf()))
    }

    fn remove(&self, path: &Path) -> Result<()> {
        self.record(VcsCall::Remove(path.to_path_buf()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_records_calls_in_order() {
        let vcs = MockVersionControl::new();
        vcs.add(Path::new("a.v")).unwrap();
        vcs.remove(Path::new("b.v")).unwrap();

        assert_eq!(
            vcs.calls(),
            vec![
                VcsCall::Add(PathBuf::from("a.v")),
                VcsCall::Remove(PathBuf::from("b.v")),
            ]
        );
    }

    #[test]
    fn test_failing_mock_still_records() {
        let vcs = MockVersionControl::failing();
        assert!(vcs.add(Path::new("a.v")).is_err());
        assert_eq!(vcs.calls().len(), 1);
    }
}
