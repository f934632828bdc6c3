use colored::*;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::colors;
use crate::error::OpResult;
use crate::validate::{validate_path, PathKind};

/// Optional filters, ANDed together. An empty filter set matches every file.
#[derive(Debug, Default, Clone)]
pub struct SearchFilters {
    /// Case-insensitive substring of the file name.
    pub name: Option<String>,
    /// Suffix the file name must end with, so compound extensions like
    /// `.tar.gz` work too.
    pub extension: Option<String>,
    /// Case-insensitive substring of the file's text content.
    pub keyword: Option<String>,
}

#[derive(Debug, Default)]
pub struct SearchReport {
    pub matches: Vec<PathBuf>,
    /// Entries the walk could not descend into or stat.
    pub dirs_skipped: usize,
}

/// Recursively search `dir` for files matching every given filter.
/// Unreadable subtrees are skipped with a warning rather than aborting.
pub fn search(dir: &Path, filters: &SearchFilters) -> OpResult<SearchReport> {
    validate_path(dir, true, PathKind::Dir)?;

    let name_needle = filters.name.as_deref().map(str::to_lowercase);
    let ext_needle = filters.extension.as_deref().map(str::to_lowercase);
    let keyword_needle = filters.keyword.as_deref().map(str::to_lowercase);

    let mut report = SearchReport::default();

    for entry in WalkDir::new(dir) {
        let entry = match entry {
            Ok(e) => e,
            Err(err) => {
                report.dirs_skipped += 1;
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

        let file_name = entry.file_name().to_string_lossy().to_lowercase();
        if let Some(needle) = &name_needle {
            if !file_name.contains(needle.as_str()) {
                continue;
            }
        }
        if let Some(ext) = &ext_needle {
            if !file_name.ends_with(ext.as_str()) {
                continue;
            }
        }
        if let Some(needle) = &keyword_needle {
            // Binary or unreadable files simply do not match.
            let found = fs::read_to_string(entry.path())
                .map(|text| text.to_lowercase().contains(needle.as_str()))
                .unwrap_or(false);
            if !found {
                continue;
            }
        }

        report.matches.push(entry.into_path());
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn fixture() -> TempDir {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("report.txt"), "quarterly totals\n").unwrap();
        fs::write(temp.path().join("Photo.JPG"), "not really a photo").unwrap();
        fs::create_dir(temp.path().join("nested")).unwrap();
        fs::write(temp.path().join("nested").join("notes.txt"), "Totals for Q3").unwrap();
        fs::write(temp.path().join("blob.bin"), [0xff, 0x00, 0x81]).unwrap();
        temp
    }

    #[test]
    fn no_filters_matches_everything() {
        let temp = fixture();
        let report = search(temp.path(), &SearchFilters::default()).unwrap();
        assert_eq!(report.matches.len(), 4);
    }

    #[test]
    fn name_filter_is_case_insensitive() {
        let temp = fixture();
        let filters = SearchFilters {
            name: Some("PHOTO".to_string()),
            ..Default::default()
        };
        let report = search(temp.path(), &filters).unwrap();
        assert_eq!(report.matches.len(), 1);
        assert!(report.matches[0].ends_with("Photo.JPG"));
    }

    #[test]
    fn extension_filter_accepts_leading_dot() {
        let temp = fixture();
        for ext in [".txt", "txt", "TXT"] {
            let filters = SearchFilters {
                extension: Some(ext.to_string()),
                ..Default::default()
            };
            let report = search(temp.path(), &filters).unwrap();
            assert_eq!(report.matches.len(), 2, "extension form {ext:?}");
        }
    }

    #[test]
    fn extension_filter_matches_compound_suffixes() {
        let temp = fixture();
        fs::write(temp.path().join("backup.tar.gz"), "tarball").unwrap();
        fs::write(temp.path().join("loose.gz"), "gzip only").unwrap();

        let filters = SearchFilters {
            extension: Some(".tar.gz".to_string()),
            ..Default::default()
        };
        let report = search(temp.path(), &filters).unwrap();
        assert_eq!(report.matches.len(), 1);
        assert!(report.matches[0].ends_with("backup.tar.gz"));
    }

    #[test]
    fn keyword_searches_content_recursively() {
        let temp = fixture();
        let filters = SearchFilters {
            keyword: Some("totals".to_string()),
            ..Default::default()
        };
        let report = search(temp.path(), &filters).unwrap();
        assert_eq!(report.matches.len(), 2);
    }

    #[test]
    fn keyword_treats_binary_files_as_non_matches() {
        let temp = fixture();
        let filters = SearchFilters {
            name: Some("blob".to_string()),
            keyword: Some("anything".to_string()),
            ..Default::default()
        };
        let report = search(temp.path(), &filters).unwrap();
        assert!(report.matches.is_empty());
    }

    #[test]
    fn filters_combine_with_and() {
        let temp = fixture();
        let filters = SearchFilters {
            name: Some("notes".to_string()),
            extension: Some("txt".to_string()),
            keyword: Some("q3".to_string()),
        };
        let report = search(temp.path(), &filters).unwrap();
        assert_eq!(report.matches.len(), 1);
    }

    #[test]
    fn search_rejects_missing_directory() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("nope");
        assert!(search(&missing, &SearchFilters::default()).is_err());
    }
}
