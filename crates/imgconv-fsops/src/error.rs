//! # Design
//!
//! - Provide structured, constant-message errors for the conversion pipeline.
//! - Capture operation context (paths, patterns) to make failures reproducible in tests.
//! - Preserve source errors without interpolating context into error messages.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result type for filesystem operations.
pub type FsOpsResult<T> = Result<T, FsOpsError>;

/// Errors produced while walking, converting, moving, or copying image trees.
#[derive(Debug, Error)]
pub enum FsOpsError {
    /// IO failures while interacting with the filesystem.
    #[error("fsops io failure")]
    Io {
        /// Operation that triggered the IO failure.
        operation: &'static str,
        /// Path involved in the IO failure.
        path: PathBuf,
        /// Underlying IO error.
        source: io::Error,
    },
    /// Walkdir traversal failures.
    #[error("fsops walkdir failure")]
    Walkdir {
        /// Operation that triggered the walkdir failure.
        operation: &'static str,
        /// Path involved in the walkdir failure.
        path: PathBuf,
        /// Underlying walkdir error.
        source: walkdir::Error,
    },
    /// The single-file filter pattern is not a valid regular expression.
    #[error("fsops invalid file filter")]
    InvalidFilter {
        /// Pattern as supplied by the caller.
        pattern: String,
        /// Underlying regex error.
        source: regex::Error,
    },
    /// A traversed path did not live under the walk root.
    #[error("fsops path outside root")]
    PathOutsideRoot {
        /// Offending path.
        path: PathBuf,
        /// Root the walk started from.
        root: PathBuf,
    },
    /// A deferred move kept failing with transient errors until the retry budget ran out.
    #[error("fsops deferred move exhausted retries")]
    MoveExhausted {
        /// Path written by the external tool.
        from: PathBuf,
        /// Path the output should end up at.
        to: PathBuf,
        /// Number of attempts made.
        attempts: u32,
        /// Last transient error observed.
        source: io::Error,
    },
}

impl FsOpsError {
    pub(crate) fn io(operation: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            operation,
            path: path.into(),
            source,
        }
    }

    pub(crate) fn walkdir(
        operation: &'static str,
        path: impl Into<PathBuf>,
        source: walkdir::Error,
    ) -> Self {
        Self::Walkdir {
            operation,
            path: path.into(),
            source,
        }
    }

    pub(crate) fn outside_root(path: impl Into<PathBuf>, root: impl Into<PathBuf>) -> Self {
        Self::PathOutsideRoot {
            path: path.into(),
            root: root.into(),
        }
    }
}
