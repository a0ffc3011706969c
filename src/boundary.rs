use std::fmt;

/// Non-fatal conditions met while synchronizing the tree.
/// These are reported to the user and never abort the run.
#[derive(Debug, Clone, PartialEq)]
pub enum BoundaryWarning {
    /// A `git add` / `git rm` invocation failed
    StagingFailed {
        action: String,
        path: String,
        reason: String,
    },
    /// A file was created but staging was not requested
    UnstagedNewFile { path: String },
    /// A dropped version has no shim file left to set aside
    MissingDroppedShim { path: String },
}

impl fmt::Display for BoundaryWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundaryWarning::StagingFailed {
                action,
                path,
                reason,
            } => {
                write!(f, "'git {} {}' failed: {}", action, path, reason)
            }
            BoundaryWarning::UnstagedNewFile { path } => {
                write!(f, "Don't forget to 'git add {}'!", path)
            }
            BoundaryWarning::MissingDroppedShim { path } => {
                write!(f, "{} is already gone, nothing to set aside", path)
            }
        }
    }
}
