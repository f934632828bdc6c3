use std::path::Path;

use crate::error::{OpError, OpResult};

/// Which on-disk type a path is expected to have.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathKind {
    File,
    Dir,
    /// Either is fine (rename/delete of files and folders alike)
    Any,
}

/// Outcome of a successful validation.
///
/// Some success cases still deserve a heads-up (e.g. creating over an
/// existing file), so "valid" is never collapsed to a bare bool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Validation {
    Ok,
    Warning(String),
}

/// Characters we refuse anywhere in a path. `<`, `>` and `|` are shell/FS
/// hazards on Windows; the control characters are hazards everywhere.
const ILLEGAL_CHARS: &[char] = &['<', '>', '|', '\0', '\n', '\r'];

/// Pre-flight check shared by every operation. Read-only: never touches the
/// filesystem beyond metadata lookups.
///
/// With `should_exist`, the path must be present and of the expected kind.
/// Without it (creation case), the parent directory must exist; an existing
/// file target yields a warning so the caller may overwrite knowingly.
pub fn validate_path(path: &Path, should_exist: bool, kind: PathKind) -> OpResult<Validation> {
    let raw = path.to_string_lossy();
    if raw.trim().is_empty() {
        return Err(OpError::InvalidPath {
            reason: "path is empty or whitespace only".to_string(),
        });
    }
    if raw.chars().any(|c| ILLEGAL_CHARS.contains(&c)) {
        return Err(OpError::InvalidPath {
            reason: format!("path contains illegal characters: {}", raw),
        });
    }

    if should_exist {
        if !path.exists() {
            return Err(OpError::NotFound {
                path: path.to_path_buf(),
            });
        }
        match kind {
            PathKind::File if path.is_dir() => {
                return Err(OpError::NotAFile {
                    path: path.to_path_buf(),
                });
            }
            PathKind::Dir if path.is_file() => {
                return Err(OpError::NotADirectory {
                    path: path.to_path_buf(),
                });
            }
            _ => {}
        }
        return Ok(Validation::Ok);
    }

    // Creation case: the target itself may be absent, but its parent must
    // exist. An empty parent component means "current directory".
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            return Err(OpError::MissingParent {
                path: parent.to_path_buf(),
            });
        }
    }

    if path.exists() {
        if kind == PathKind::File && path.is_dir() {
            return Err(OpError::NotAFile {
                path: path.to_path_buf(),
            });
        }
        if kind == PathKind::File {
            return Ok(Validation::Warning(format!(
                "{} already exists and will be overwritten",
                path.display()
            )));
        }
    }

    Ok(Validation::Ok)
}
