//! Error types for dataset splitting.

use std::path::PathBuf;
use std::process::ExitCode;
use thiserror::Error;

use crate::engine::operations::FileOpError;

/// Result type for split operations
pub type SplitResult<T> = Result<T, SplitError>;

/// Errors that can occur while planning or executing a split.
#[derive(Debug, Error)]
pub enum SplitError {
    /// Invalid ratios, paths, extensions or config file contents.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Source root, label directory or explicit config file is missing.
    #[error("not found: {}", .0.display())]
    NotFound(PathBuf),

    /// A destination file already exists.
    #[error("destination already exists: {}", .0.display())]
    Collision(PathBuf),

    /// Filesystem failure while reading, creating, moving or removing.
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl SplitError {
    pub fn config(msg: impl Into<String>) -> Self {
        SplitError::Configuration(msg.into())
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SplitError::Io {
            path: path.into(),
            source,
        }
    }

    /// Process exit code reported by the CLI for this error kind.
    pub fn exit_code(&self) -> ExitCode {
        match self {
            SplitError::Io { .. } => ExitCode::from(1),
            SplitError::Configuration(_) => ExitCode::from(2),
            SplitError::NotFound(_) => ExitCode::from(3),
            SplitError::Collision(_) => ExitCode::from(4),
        }
    }
}

impl From<FileOpError> for SplitError {
    fn from(error: FileOpError) -> Self {
        match error {
            FileOpError::SourceMissing(path) => SplitError::NotFound(path),
            FileOpError::DestinationExists(path) => SplitError::Collision(path),
            FileOpError::CopyFailed { path, source }
            | FileOpError::RemoveFailed { path, source }
            | FileOpError::CreateDirFailed { path, source } => SplitError::Io { path, source },
        }
    }
}
