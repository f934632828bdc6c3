use chrono::Local;
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::HashMap;
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

use crate::colors;
use crate::config::Config;
use crate::error::{OpError, OpResult};
use crate::ops::suggest_compression;
use crate::validate::{validate_path, PathKind};

/// Extension to category table. Unlisted extensions (and files with no
/// extension at all) land in `FALLBACK_CATEGORY`.
const EXTENSION_TABLE: &[(&str, &str)] = &[
    (".jpg", "Images"),
    (".jpeg", "Images"),
    (".png", "Images"),
    (".gif", "Images"),
    (".svg", "Images"),
    (".webp", "Images"),
    (".heic", "Images"),
    (".mp4", "Videos"),
    (".avi", "Videos"),
    (".mkv", "Videos"),
    (".mov", "Videos"),
    (".wmv", "Videos"),
    (".pdf", "Documents"),
    (".doc", "Documents"),
    (".docx", "Documents"),
    (".xls", "Documents"),
    (".xlsx", "Documents"),
    (".csv", "Documents"),
    (".ppt", "Documents"),
    (".pptx", "Documents"),
    (".txt", "Documents"),
    (".mp3", "Music"),
    (".wav", "Music"),
    (".aac", "Music"),
    (".flac", "Music"),
    (".py", "Programs"),
    (".ipynb", "Programs"),
    (".c", "Programs"),
    (".cpp", "Programs"),
    (".java", "Programs"),
    (".js", "Programs"),
    (".ts", "Programs"),
    (".sh", "Programs"),
    (".exe", "Applications"),
    (".msi", "Applications"),
    (".apk", "Applications"),
    (".dmg", "Applications"),
    (".deb", "Applications"),
    (".rpm", "Applications"),
    (".zip", "Compressed"),
    (".rar", "Compressed"),
    (".7z", "Compressed"),
    (".tar", "Compressed"),
    (".gz", "Compressed"),
];

pub const FALLBACK_CATEGORY: &str = "Misc";

/// Maps file extensions to category folder names. Built once, shared by
/// every organize run.
pub struct Classifier {
    table: HashMap<&'static str, &'static str>,
}

impl Classifier {
    pub fn new() -> Self {
        Self {
            table: EXTENSION_TABLE.iter().copied().collect(),
        }
    }

    /// Category folder name for a path, by lowercased extension.
    pub fn category_for(&self, path: &Path) -> &'static str {
        path.extension()
            .map(|e| format!(".{}", e.to_string_lossy().to_lowercase()))
            .and_then(|ext| self.table.get(ext.as_str()).copied())
            .unwrap_or(FALLBACK_CATEGORY)
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug)]
pub struct MovedFile {
    pub original_path: PathBuf,
    pub new_path: PathBuf,
    pub category: &'static str,
}

#[derive(Debug, Default)]
pub struct OrganizeReport {
    pub moved: Vec<MovedFile>,
    /// Files left in place, with the reason each was skipped.
    pub skipped: Vec<(PathBuf, String)>,
    /// Moves a dry run would have performed.
    pub planned: usize,
    pub bundle: Option<PathBuf>,
}

#[derive(Debug, Default, Clone)]
pub struct OrganizeOptions {
    pub dry_run: bool,
    pub bundle: bool,
    pub bundle_dest: Option<PathBuf>,
}

/// Sort the immediate children of `folder` into category subfolders.
///
/// Best-effort: per-file failures are recorded and the run continues, so a
/// locked file never blocks the rest. Subdirectories are never touched,
/// which also makes reruns idempotent once category folders exist. With
/// `bundle` set, successfully moved files are additionally zipped into a
/// timestamped archive; a failed bundle never undoes the moves.
pub fn organize(
    folder: &Path,
    classifier: &Classifier,
    config: &Config,
    opts: &OrganizeOptions,
) -> OpResult<OrganizeReport> {
    validate_path(folder, true, PathKind::Dir)?;

    let read = fs::read_dir(folder).map_err(|e| OpError::from_io("listing folder", folder, e))?;
    let meta =
        fs::metadata(folder).map_err(|e| OpError::from_io("inspecting folder", folder, e))?;
    if meta.permissions().readonly() {
        return Err(OpError::AccessDenied {
            path: folder.to_path_buf(),
        });
    }

    let mut files: Vec<PathBuf> = Vec::new();
    for entry in read {
        let entry = entry.map_err(|e| OpError::from_io("listing folder", folder, e))?;
        let path = entry.path();
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort();

    let mut report = OrganizeReport::default();
    if files.is_empty() {
        println!("{}", "Nothing to organize.".color(colors::WARNING));
        return Ok(report);
    }

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::with_template("{bar:30.cyan/blue} {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );

    for path in files {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        pb.set_message(name.clone());

        let category = classifier.category_for(&path);
        let target_dir = folder.join(category);
        let target = target_dir.join(&name);

        // A file another process holds open for exclusive access fails this
        // probe; skip it rather than abort the run. Probed before the
        // dry-run branch so a preview never promises a move the real run
        // would skip.
        if OpenOptions::new().read(true).write(true).open(&path).is_err() {
            report
                .skipped
                .push((path.clone(), "file is locked or unreadable".to_string()));
            pb.inc(1);
            continue;
        }

        if opts.dry_run {
            pb.println(format!(
                "would move {} -> {}/",
                name.color(colors::PATH),
                category.color(colors::HEADER)
            ));
            report.planned += 1;
            pb.inc(1);
            continue;
        }

        if let Err(e) = fs::create_dir_all(&target_dir) {
            report.skipped.push((
                path.clone(),
                format!("cannot create {category} folder: {e}"),
            ));
            pb.inc(1);
            continue;
        }

        match fs::rename(&path, &target) {
            Ok(()) => {
                suggest_compression(&target, config.compress_suggest_mb);
                report.moved.push(MovedFile {
                    original_path: path,
                    new_path: target,
                    category,
                });
            }
            Err(e) => {
                report.skipped.push((path.clone(), format!("move failed: {e}")));
            }
        }
        pb.inc(1);
    }
    pb.finish_and_clear();

    if opts.bundle && !opts.dry_run && !report.moved.is_empty() {
        match bundle_moved(folder, config, opts, &report.moved) {
            Ok(path) => report.bundle = Some(path),
            Err(e) => eprintln!(
                "{} files were organized but bundling failed: {e}",
                "warning:".color(colors::WARNING)
            ),
        }
    }

    Ok(report)
}

/// Zip the moved files into `archive_<timestamp>.zip` with flat entry names.
fn bundle_moved(
    folder: &Path,
    config: &Config,
    opts: &OrganizeOptions,
    moved: &[MovedFile],
) -> OpResult<PathBuf> {
    let dest_dir = opts
        .bundle_dest
        .clone()
        .unwrap_or_else(|| folder.join(&config.bundle_dir_name));
    fs::create_dir_all(&dest_dir)
        .map_err(|e| OpError::from_io("creating bundle directory", &dest_dir, e))?;

    let stamp = Local::now().format("%Y%m%d_%H%M%S");
    let archive_path = dest_dir.join(format!("archive_{stamp}.zip"));

    let file = fs::File::create(&archive_path)
        .map_err(|e| OpError::from_io("creating bundle archive", &archive_path, e))?;
    let mut writer = zip::ZipWriter::new(file);
    let options = zip::write::SimpleFileOptions::default()
        .compression_method(zip::CompressionMethod::Deflated);

    for item in moved {
        let entry_name = item
            .new_path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        writer
            .start_file(entry_name, options)
            .map_err(|e| OpError::Unknown {
                context: "adding bundle entry".to_string(),
                path: item.new_path.clone(),
                source: std::io::Error::new(std::io::ErrorKind::Other, e),
            })?;
        let mut reader = fs::File::open(&item.new_path)
            .map_err(|e| OpError::from_io("reading moved file", &item.new_path, e))?;
        std::io::copy(&mut reader, &mut writer)
            .map_err(|e| OpError::from_io("bundling file", &item.new_path, e))?;
    }
    writer.finish().map_err(|e| OpError::Unknown {
        context: "finalizing bundle".to_string(),
        path: archive_path.clone(),
        source: std::io::Error::new(std::io::ErrorKind::Other, e),
    })?;

    Ok(archive_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn run(folder: &Path, opts: &OrganizeOptions) -> OrganizeReport {
        organize(folder, &Classifier::new(), &Config::default(), opts).unwrap()
    }

    #[test]
    fn every_table_extension_maps_to_its_category() {
        let classifier = Classifier::new();
        for (ext, category) in EXTENSION_TABLE {
            let path = PathBuf::from(format!("file{ext}"));
            assert_eq!(classifier.category_for(&path), *category, "{ext}");
        }
    }

    #[test]
    fn unknown_and_missing_extensions_fall_back_to_misc() {
        let classifier = Classifier::new();
        assert_eq!(classifier.category_for(Path::new("a.xyz")), "Misc");
        assert_eq!(classifier.category_for(Path::new("README")), "Misc");
        assert_eq!(classifier.category_for(Path::new("photo.JPG")), "Images");
    }

    #[test]
    fn files_move_into_category_folders() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("a.jpg"), "img").unwrap();
        fs::write(temp.path().join("b.txt"), "doc").unwrap();
        fs::write(temp.path().join("c.xyz"), "???").unwrap();

        let report = run(temp.path(), &OrganizeOptions::default());
        assert_eq!(report.moved.len(), 3);
        assert!(report.skipped.is_empty());
        assert!(temp.path().join("Images").join("a.jpg").is_file());
        assert!(temp.path().join("Documents").join("b.txt").is_file());
        assert!(temp.path().join("Misc").join("c.xyz").is_file());
        assert!(!temp.path().join("a.jpg").exists());
    }

    #[test]
    fn dry_run_plans_without_touching_anything() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("a.jpg"), "img").unwrap();
        fs::write(temp.path().join("b.txt"), "doc").unwrap();

        let report = run(
            temp.path(),
            &OrganizeOptions {
                dry_run: true,
                ..Default::default()
            },
        );
        assert_eq!(report.planned, 2);
        assert!(report.moved.is_empty());
        assert!(temp.path().join("a.jpg").is_file());
        assert!(!temp.path().join("Images").exists());
    }

    #[test]
    fn rerun_ignores_existing_category_folders() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("a.jpg"), "img").unwrap();
        run(temp.path(), &OrganizeOptions::default());

        // Second pass sees only directories, so nothing moves.
        let report = run(temp.path(), &OrganizeOptions::default());
        assert!(report.moved.is_empty());
        assert!(temp.path().join("Images").join("a.jpg").is_file());
    }

    #[test]
    fn empty_folder_reports_no_work() {
        let temp = TempDir::new().unwrap();
        let report = run(temp.path(), &OrganizeOptions::default());
        assert!(report.moved.is_empty());
        assert!(report.skipped.is_empty());
        assert_eq!(report.planned, 0);
    }

    #[test]
    fn bundle_collects_moved_files_into_timestamped_zip() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("a.jpg"), "img").unwrap();
        fs::write(temp.path().join("b.txt"), "doc").unwrap();

        let report = run(
            temp.path(),
            &OrganizeOptions {
                bundle: true,
                ..Default::default()
            },
        );
        assert_eq!(report.moved.len(), 2);

        let bundle = report.bundle.expect("bundle path");
        assert!(bundle.starts_with(temp.path().join("Compressed")));
        let name = bundle.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("archive_") && name.ends_with(".zip"), "{name}");

        let mut archive = zip::ZipArchive::new(fs::File::open(&bundle).unwrap()).unwrap();
        assert_eq!(archive.len(), 2);
        let names: Vec<String> = (0..archive.len())
            .map(|i| archive.by_index(i).unwrap().name().to_string())
            .collect();
        assert!(names.contains(&"a.jpg".to_string()));
        assert!(names.contains(&"b.txt".to_string()));
    }

    #[test]
    fn bundle_is_skipped_when_nothing_moved() {
        let temp = TempDir::new().unwrap();
        let report = run(
            temp.path(),
            &OrganizeOptions {
                bundle: true,
                ..Default::default()
            },
        );
        assert!(report.bundle.is_none());
        assert!(!temp.path().join("Compressed").exists());
    }

    #[cfg(unix)]
    #[test]
    fn dry_run_skips_unreadable_files_like_a_real_run() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().unwrap();
        let locked = temp.path().join("locked.txt");
        fs::write(&locked, "secret").unwrap();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();
        if fs::File::open(&locked).is_ok() {
            return;
        }
        fs::write(temp.path().join("ok.jpg"), "fine").unwrap();

        let dry = run(
            temp.path(),
            &OrganizeOptions {
                dry_run: true,
                ..Default::default()
            },
        );
        assert_eq!(dry.planned, 1);
        assert_eq!(dry.skipped.len(), 1);

        // The preview and the real run agree on what moves.
        let real = run(temp.path(), &OrganizeOptions::default());
        assert_eq!(real.moved.len(), dry.planned);
        assert_eq!(real.skipped.len(), 1);
        assert!(locked.exists());

        fs::set_permissions(&locked, fs::Permissions::from_mode(0o644)).unwrap();
    }

    #[cfg(unix)]
    #[test]
    fn unreadable_file_is_skipped_not_fatal() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().unwrap();
        let locked = temp.path().join("locked.txt");
        fs::write(&locked, "secret").unwrap();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();
        // Privileged users ignore mode bits; nothing to assert in that case.
        if fs::File::open(&locked).is_ok() {
            return;
        }
        fs::write(temp.path().join("ok.txt"), "fine").unwrap();

        let report = run(temp.path(), &OrganizeOptions::default());
        assert_eq!(report.moved.len(), 1);
        assert_eq!(report.skipped.len(), 1);
        assert!(locked.exists());

        fs::set_permissions(&locked, fs::Permissions::from_mode(0o644)).unwrap();
    }
}
