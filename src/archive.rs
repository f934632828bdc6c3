use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use path_slash::PathExt;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;
use zip::result::ZipError;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::colors;
use crate::error::{OpError, OpResult};
use crate::validate::{validate_path, PathKind};

/// Append `.zip` when the destination lacks it, so `compress(src, "backup")`
/// produces `backup.zip`.
pub fn ensure_zip_suffix(dst: &Path) -> PathBuf {
    let is_zip = dst
        .extension()
        .map(|e| e.eq_ignore_ascii_case("zip"))
        .unwrap_or(false);
    if is_zip {
        dst.to_path_buf()
    } else {
        let mut name = dst.as_os_str().to_os_string();
        name.push(".zip");
        PathBuf::from(name)
    }
}

fn zip_options() -> SimpleFileOptions {
    SimpleFileOptions::default().compression_method(CompressionMethod::Deflated)
}

fn from_zip_err(context: &str, path: &Path, err: ZipError) -> OpError {
    match err {
        ZipError::Io(e) => OpError::from_io(context, path, e),
        other => OpError::Unknown {
            context: context.to_string(),
            path: path.to_path_buf(),
            source: io::Error::new(io::ErrorKind::Other, other),
        },
    }
}

/// Compress a file or directory into a zip archive. Returns the number of
/// entries written and the (suffix-coerced) archive path. Unreadable files
/// inside a directory source are skipped with a warning; a directory with
/// nothing readable inside yields `EmptySource` and leaves no archive behind.
pub fn compress(src: &Path, dst: &Path) -> OpResult<(usize, PathBuf)> {
    validate_path(src, true, PathKind::Any)?;
    let dst = ensure_zip_suffix(dst);

    if let Some(parent) = dst.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)
                .map_err(|e| OpError::from_io("creating archive directory", parent, e))?;
        }
    }

    // Collect entries up front: relative slash-separated names keep archives
    // portable across platforms, and unreadable files are skipped rather
    // than sinking the whole archive.
    let mut entries: Vec<(PathBuf, String)> = Vec::new();
    if src.is_dir() {
        for entry in WalkDir::new(src) {
            let entry = match entry {
                Ok(e) => e,
                Err(err) => {
                    eprintln!(
                        "{} skipping unreadable entry: {}",
                        "warning:".color(colors::WARNING),
                        err
                    );
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }
            let rel = match entry.path().strip_prefix(src) {
                Ok(r) => r.to_slash_lossy().to_string(),
                Err(_) => continue,
            };
            entries.push((entry.into_path(), rel));
        }
        if entries.is_empty() {
            return Err(OpError::EmptySource {
                path: src.to_path_buf(),
            });
        }
    } else {
        let name = src
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .ok_or_else(|| OpError::InvalidPath {
                reason: "source has no file name".to_string(),
            })?;
        entries.push((src.to_path_buf(), name));
    }

    let file =
        File::create(&dst).map_err(|e| OpError::from_io("creating archive", &dst, e))?;
    let mut writer = ZipWriter::new(file);

    let pb = ProgressBar::new(entries.len() as u64);
    pb.set_style(
        ProgressStyle::with_template("{bar:30.cyan/blue} {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );

    let dir_source = src.is_dir();
    let write_result: OpResult<usize> = (|| {
        let mut written = 0;
        for (path, name) in &entries {
            pb.set_message(name.clone());
            // An entry that cannot be opened is skipped, same as entries
            // the walk could not reach. A single-file source has nothing
            // to fall back to, so there the failure is the caller's.
            let mut reader = match File::open(path) {
                Ok(f) => f,
                Err(e) if dir_source => {
                    eprintln!(
                        "{} skipping unreadable file {}: {}",
                        "warning:".color(colors::WARNING),
                        path.display(),
                        e
                    );
                    pb.inc(1);
                    continue;
                }
                Err(e) => return Err(OpError::from_io("reading source file", path, e)),
            };
            writer
                .start_file(name.as_str(), zip_options())
                .map_err(|e| from_zip_err("adding archive entry", path, e))?;
            io::copy(&mut reader, &mut writer)
                .map_err(|e| OpError::from_io("compressing file", path, e))?;
            written += 1;
            pb.inc(1);
        }
        writer
            .finish()
            .map_err(|e| from_zip_err("finalizing archive", &dst, e))?;
        Ok(written)
    })();
    pb.finish_and_clear();

    let written = match write_result {
        Ok(n) => n,
        Err(e) => {
            let _ = fs::remove_file(&dst);
            return Err(e);
        }
    };
    if written == 0 {
        let _ = fs::remove_file(&dst);
        return Err(OpError::EmptySource {
            path: src.to_path_buf(),
        });
    }

    Ok((written, dst))
}

/// Extract a zip archive into `dst`, creating it as needed. Every entry is
/// read through once before extraction so CRC mismatches and truncated
/// archives surface as `CorruptArchive` instead of a half-written tree.
pub fn extract(src: &Path, dst: &Path) -> OpResult<usize> {
    validate_path(src, true, PathKind::File)?;
    let is_zip = src
        .extension()
        .map(|e| e.eq_ignore_ascii_case("zip"))
        .unwrap_or(false);
    if !is_zip {
        return Err(OpError::InvalidPath {
            reason: format!("{} is not a .zip archive", src.display()),
        });
    }

    let file = File::open(src).map_err(|e| OpError::from_io("opening archive", src, e))?;
    let mut archive = ZipArchive::new(file).map_err(|_| OpError::CorruptArchive {
        path: src.to_path_buf(),
        entry: "central directory".to_string(),
    })?;

    // Integrity pass: decompressing to a sink checks each entry's CRC.
    for i in 0..archive.len() {
        let mut entry = match archive.by_index(i) {
            Ok(e) => e,
            Err(_) => {
                return Err(OpError::CorruptArchive {
                    path: src.to_path_buf(),
                    entry: format!("entry #{i}"),
                })
            }
        };
        let name = entry.name().to_string();
        if io::copy(&mut entry, &mut io::sink()).is_err() {
            return Err(OpError::CorruptArchive {
                path: src.to_path_buf(),
                entry: name,
            });
        }
    }

    fs::create_dir_all(dst)
        .map_err(|e| OpError::from_io("creating extraction directory", dst, e))?;
    archive
        .extract(dst)
        .map_err(|e| from_zip_err("extracting archive", src, e))?;

    Ok(archive.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn suffix_is_coerced_but_not_doubled() {
        assert_eq!(ensure_zip_suffix(Path::new("a")), PathBuf::from("a.zip"));
        assert_eq!(
            ensure_zip_suffix(Path::new("a.zip")),
            PathBuf::from("a.zip")
        );
        assert_eq!(
            ensure_zip_suffix(Path::new("a.ZIP")),
            PathBuf::from("a.ZIP")
        );
        assert_eq!(
            ensure_zip_suffix(Path::new("a.tar")),
            PathBuf::from("a.tar.zip")
        );
    }

    #[test]
    fn directory_round_trip_preserves_structure() {
        let temp = TempDir::new().unwrap();
        let src = temp.path().join("tree");
        fs::create_dir_all(src.join("nested")).unwrap();
        fs::write(src.join("top.txt"), "top level").unwrap();
        fs::write(src.join("nested").join("deep.txt"), "below").unwrap();

        let (count, archive) = compress(&src, &temp.path().join("backup")).unwrap();
        assert_eq!(count, 2);
        assert_eq!(archive, temp.path().join("backup.zip"));

        let out = temp.path().join("restored");
        let extracted = extract(&archive, &out).unwrap();
        assert_eq!(extracted, 2);
        assert_eq!(fs::read_to_string(out.join("top.txt")).unwrap(), "top level");
        assert_eq!(
            fs::read_to_string(out.join("nested").join("deep.txt")).unwrap(),
            "below"
        );
    }

    #[test]
    fn single_file_compresses_under_its_own_name() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("solo.txt");
        fs::write(&file, "alone").unwrap();

        let (count, archive) = compress(&file, &temp.path().join("solo.zip")).unwrap();
        assert_eq!(count, 1);

        let out = temp.path().join("out");
        extract(&archive, &out).unwrap();
        assert_eq!(fs::read_to_string(out.join("solo.txt")).unwrap(), "alone");
    }

    #[test]
    fn empty_directory_leaves_no_archive() {
        let temp = TempDir::new().unwrap();
        let src = temp.path().join("empty");
        fs::create_dir(&src).unwrap();

        let dst = temp.path().join("empty.zip");
        assert!(matches!(
            compress(&src, &dst),
            Err(OpError::EmptySource { .. })
        ));
        assert!(!dst.exists());
    }

    #[cfg(unix)]
    #[test]
    fn unreadable_file_in_directory_is_skipped() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().unwrap();
        let src = temp.path().join("tree");
        fs::create_dir(&src).unwrap();
        fs::write(src.join("ok.txt"), "readable").unwrap();
        let locked = src.join("locked.txt");
        fs::write(&locked, "secret").unwrap();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();
        // Privileged users ignore mode bits; nothing to assert in that case.
        if fs::File::open(&locked).is_ok() {
            return;
        }

        let (count, archive) = compress(&src, &temp.path().join("partial")).unwrap();
        assert_eq!(count, 1);

        let mut zip = ZipArchive::new(File::open(&archive).unwrap()).unwrap();
        assert_eq!(zip.len(), 1);
        assert_eq!(zip.by_index(0).unwrap().name(), "ok.txt");

        fs::set_permissions(&locked, fs::Permissions::from_mode(0o644)).unwrap();
    }

    #[cfg(unix)]
    #[test]
    fn directory_of_only_unreadable_files_leaves_no_archive() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().unwrap();
        let src = temp.path().join("tree");
        fs::create_dir(&src).unwrap();
        let locked = src.join("locked.txt");
        fs::write(&locked, "secret").unwrap();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();
        if fs::File::open(&locked).is_ok() {
            return;
        }

        let dst = temp.path().join("nothing.zip");
        assert!(matches!(
            compress(&src, &dst),
            Err(OpError::EmptySource { .. })
        ));
        assert!(!dst.exists());

        fs::set_permissions(&locked, fs::Permissions::from_mode(0o644)).unwrap();
    }

    #[test]
    fn extract_rejects_non_zip_input() {
        let temp = TempDir::new().unwrap();
        let txt = temp.path().join("plain.txt");
        fs::write(&txt, "not an archive").unwrap();
        assert!(matches!(
            extract(&txt, &temp.path().join("out")),
            Err(OpError::InvalidPath { .. })
        ));
    }

    #[test]
    fn extract_flags_garbage_as_corrupt() {
        let temp = TempDir::new().unwrap();
        let fake = temp.path().join("fake.zip");
        fs::write(&fake, "definitely not a zip file").unwrap();
        assert!(matches!(
            extract(&fake, &temp.path().join("out")),
            Err(OpError::CorruptArchive { .. })
        ));
    }
}
