use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type shared by every file operation.
pub type OpResult<T> = Result<T, OpError>;

/// Errors that can occur during file operations.
///
/// Validation failures are raised before any mutation; mutation failures
/// carry the offending path. Anything the taxonomy does not name ends up in
/// `Unknown` with the underlying io error attached, never swallowed.
#[derive(Debug, Error)]
pub enum OpError {
    #[error("invalid path: {reason}")]
    InvalidPath { reason: String },

    #[error("path does not exist: {path}")]
    NotFound { path: PathBuf },

    #[error("expected a file but found a directory: {path}")]
    NotAFile { path: PathBuf },

    #[error("expected a directory but found a file: {path}")]
    NotADirectory { path: PathBuf },

    #[error("parent directory does not exist: {path}")]
    MissingParent { path: PathBuf },

    #[error("permission denied: {path}")]
    AccessDenied { path: PathBuf },

    #[error("destination already exists: {path}")]
    AlreadyExists { path: PathBuf },

    #[error("corrupt archive {path}: first bad entry '{entry}'")]
    CorruptArchive { path: PathBuf, entry: String },

    #[error("nothing to archive in {path}")]
    EmptySource { path: PathBuf },

    #[error("{context} ({path}): {source}")]
    Unknown {
        context: String,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl OpError {
    /// Maps an io error onto the taxonomy, tagging the path it happened on.
    pub fn from_io(context: &str, path: &Path, err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => OpError::NotFound {
                path: path.to_path_buf(),
            },
            io::ErrorKind::PermissionDenied => OpError::AccessDenied {
                path: path.to_path_buf(),
            },
            io::ErrorKind::AlreadyExists => OpError::AlreadyExists {
                path: path.to_path_buf(),
            },
            _ => OpError::Unknown {
                context: context.to_string(),
                path: path.to_path_buf(),
                source: err,
            },
        }
    }
}
