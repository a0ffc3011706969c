use std::path::PathBuf;

use thiserror::Error;

/// Unified error type for update-compat operations
#[derive(Error, Debug)]
pub enum UpdateCompatError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Version error: {0}")]
    Version(String),

    /// A target file no longer has the shape the updaters rewrite
    #[error("Unrecognized structure in {}: {expected}", .path.display())]
    Structure { path: PathBuf, expected: String },

    /// Regeneration would change a file while running with --assert-unchanged
    #[error("{message}")]
    Drift { path: PathBuf, message: String },

    #[error("Version control command failed: {0}")]
    Vcs(String),

    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("Invalid pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in update-compat
pub type Result<T> = std::result::Result<T, UpdateCompatError>;

impl UpdateCompatError {
    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        UpdateCompatError::Config(msg.into())
    }

    /// Create a version error with context
    pub fn version(msg: impl Into<String>) -> Self {
        UpdateCompatError::Version(msg.into())
    }

    /// Create a structural error for a file that lost its expected shape
    pub fn structure(path: impl Into<PathBuf>, expected: impl Into<String>) -> Self {
        UpdateCompatError::Structure {
            path: path.into(),
            expected: expected.into(),
        }
    }

    /// Create an assert-unchanged violation
    pub fn drift(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        UpdateCompatError::Drift {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a version control error with context
    pub fn vcs(msg: impl Into<String>) -> Self {
        UpdateCompatError::Vcs(msg.into())
    }
}
