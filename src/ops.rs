use colored::*;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

use crate::colors;
use crate::error::{OpError, OpResult};
use crate::validate::{validate_path, PathKind, Validation};

/// Create an empty file. The parent directory must already exist; creating
/// over an existing file is allowed but warned about.
pub fn create_file(path: &Path) -> OpResult<()> {
    match validate_path(path, false, PathKind::File)? {
        Validation::Warning(msg) => {
            eprintln!("{} {}", "warning:".color(colors::WARNING), msg);
        }
        Validation::Ok => {}
    }

    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| OpError::from_io("creating file", path, e))?;
    Ok(())
}

/// Read a file as UTF-8 text.
pub fn read_file(path: &Path) -> OpResult<String> {
    validate_path(path, true, PathKind::File)?;

    fs::read_to_string(path).map_err(|e| {
        if e.kind() == io::ErrorKind::InvalidData {
            OpError::Unknown {
                context: "file is not valid UTF-8 text".to_string(),
                path: path.to_path_buf(),
                source: e,
            }
        } else {
            OpError::from_io("reading file", path, e)
        }
    })
}

/// Write (or append) a newline-terminated line of text. Appending requires
/// the file to exist already; writing creates it, parents included.
pub fn write_file(path: &Path, text: &str, append: bool, suggest_threshold_mb: u64) -> OpResult<()> {
    if append {
        validate_path(path, true, PathKind::File)?;
    } else {
        match validate_path(path, false, PathKind::File)? {
            Validation::Warning(msg) => {
                eprintln!("{} {}", "warning:".color(colors::WARNING), msg);
            }
            Validation::Ok => {}
        }
    }

    let mut file = OpenOptions::new()
        .create(!append)
        .append(append)
        .write(true)
        .truncate(!append)
        .open(path)
        .map_err(|e| OpError::from_io("opening file for writing", path, e))?;
    writeln!(file, "{}", text).map_err(|e| OpError::from_io("writing file", path, e))?;

    suggest_compression(path, suggest_threshold_mb);
    Ok(())
}

/// Rename a file or directory. The destination must not exist.
pub fn rename_item(src: &Path, dst: &Path) -> OpResult<()> {
    validate_path(src, true, PathKind::Any)?;
    validate_path(dst, false, PathKind::Any)?;
    if dst.exists() {
        return Err(OpError::AlreadyExists {
            path: dst.to_path_buf(),
        });
    }

    fs::rename(src, dst).map_err(|e| OpError::from_io("renaming", src, e))
}

/// Delete a file or directory (recursively). With `use_trash` the item goes
/// to the OS recycle bin instead of being removed outright.
pub fn delete_item(path: &Path, use_trash: bool) -> OpResult<()> {
    validate_path(path, true, PathKind::Any)?;

    if use_trash {
        return trash::delete(path).map_err(|e| OpError::Unknown {
            context: "moving to trash".to_string(),
            path: path.to_path_buf(),
            source: io::Error::new(io::ErrorKind::Other, e),
        });
    }

    if path.is_dir() {
        fs::remove_dir_all(path).map_err(|e| OpError::from_io("deleting directory", path, e))
    } else {
        fs::remove_file(path).map_err(|e| OpError::from_io("deleting file", path, e))
    }
}

/// Copy a file or directory tree. Copying a directory onto an existing
/// directory merges the contents, mirroring `cp -r`-with-merge semantics.
pub fn copy_item(src: &Path, dst: &Path, suggest_threshold_mb: u64) -> OpResult<()> {
    validate_path(src, true, PathKind::Any)?;
    let raw_dst = dst.to_string_lossy();
    if raw_dst.trim().is_empty() {
        return Err(OpError::InvalidPath {
            reason: "destination path is empty".to_string(),
        });
    }

    if let Some(parent) = dst.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)
                .map_err(|e| OpError::from_io("creating destination directory", parent, e))?;
        }
    }

    if src.is_dir() {
        let mut options = fs_extra::dir::CopyOptions::new();
        if dst.exists() {
            eprintln!(
                "{} destination exists, merging contents",
                "warning:".color(colors::WARNING)
            );
            options.content_only = true;
            options.overwrite = true;
            fs_extra::dir::copy(src, dst, &options)
        } else {
            options.copy_inside = true;
            fs_extra::dir::copy(src, dst, &options)
        }
        .map_err(|e| OpError::Unknown {
            context: "copying directory".to_string(),
            path: src.to_path_buf(),
            source: io::Error::new(io::ErrorKind::Other, e),
        })?;
    } else {
        fs::copy(src, dst).map_err(|e| OpError::from_io("copying file", src, e))?;
    }

    suggest_compression(dst, suggest_threshold_mb);
    Ok(())
}

/// Move a file or directory. Same-device moves are a single rename; across
/// devices this falls back to copy-and-delete via fs_extra.
pub fn move_item(src: &Path, dst: &Path, suggest_threshold_mb: u64) -> OpResult<()> {
    validate_path(src, true, PathKind::Any)?;
    let raw_dst = dst.to_string_lossy();
    if raw_dst.trim().is_empty() {
        return Err(OpError::InvalidPath {
            reason: "destination path is empty".to_string(),
        });
    }

    if let Some(parent) = dst.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)
                .map_err(|e| OpError::from_io("creating destination directory", parent, e))?;
        }
    }

    if fs::rename(src, dst).is_err() {
        let wrap = |e: fs_extra::error::Error| OpError::Unknown {
            context: "moving across devices".to_string(),
            path: src.to_path_buf(),
            source: io::Error::new(io::ErrorKind::Other, e),
        };
        if src.is_dir() {
            let mut options = fs_extra::dir::CopyOptions::new();
            options.copy_inside = true;
            fs_extra::dir::move_dir(src, dst, &options).map_err(wrap)?;
        } else {
            let options = fs_extra::file::CopyOptions::new();
            fs_extra::file::move_file(src, dst, &options).map_err(wrap)?;
        }
    }

    suggest_compression(dst, suggest_threshold_mb);
    Ok(())
}

/// Advisory printed after writes/copies/moves that leave a large file
/// behind. Pure observer: never fails and never changes control flow.
pub fn suggest_compression(path: &Path, threshold_mb: u64) {
    if let Ok(metadata) = fs::metadata(path) {
        if metadata.is_file() {
            let size_mb = metadata.len() as f64 / (1024.0 * 1024.0);
            if size_mb > threshold_mb as f64 {
                println!(
                    "{} {} is {:.1} MB - consider compressing it",
                    "hint:".color(colors::WARNING),
                    path.display().to_string().color(colors::PATH),
                    size_mb
                );
            }
        }
    }
}
