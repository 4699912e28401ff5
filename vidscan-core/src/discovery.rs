//! File discovery module for building the scan work list.
//!
//! Walks the source tree recursively and keeps regular files (including
//! symlinks that resolve to regular files) whose extension
//! (case-insensitive) is one of the configured container extensions. The
//! returned list is sorted lexicographically by path so results do not
//! depend on filesystem traversal order.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::{CoreError, CoreResult};

/// Finds candidate video files under `source_dir`.
///
/// Unreadable subdirectories and broken entries are logged and skipped; only
/// a failure to read `source_dir` itself is returned as an error. Symlinked
/// files are kept; symlinked directories are not descended into.
///
/// # Examples
///
/// ```rust,no_run
/// use vidscan_core::find_video_files;
/// use std::path::Path;
///
/// let files = find_video_files(Path::new("/src"), &["mp4".to_string()]).unwrap();
/// println!("Found {} candidate files", files.len());
/// ```
pub fn find_video_files(source_dir: &Path, extensions: &[String]) -> CoreResult<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in WalkDir::new(source_dir).follow_links(false) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if e.depth() == 0 => return Err(CoreError::Walkdir(e)),
            Err(e) => {
                log::warn!("Skipping unreadable entry during discovery: {}", e);
                continue;
            }
        };

        // Without follow_links a symlink reports its own type; resolve it.
        let is_file = entry.file_type().is_file()
            || (entry.path_is_symlink() && entry.path().is_file());
        if !is_file {
            continue;
        }

        let has_extension = entry
            .path()
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| {
                extensions
                    .iter()
                    .any(|wanted| wanted.trim_start_matches('.').eq_ignore_ascii_case(ext))
            });
        if has_extension {
            files.push(entry.into_path());
        }
    }

    files.sort();
    log::debug!("Discovered {} candidate file(s) under {}", files.len(), source_dir.display());
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{self, File};

    #[test]
    fn test_extension_filter_is_case_insensitive_and_recursive() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("b/deeper")).unwrap();
        File::create(root.join("z.mp4")).unwrap();
        File::create(root.join("A.MP4")).unwrap();
        File::create(root.join("b/deeper/c.Mp4")).unwrap();
        File::create(root.join("notes.txt")).unwrap();
        File::create(root.join("mp4")).unwrap();
        fs::create_dir(root.join("folder.mp4")).unwrap();

        let files = find_video_files(root, &["mp4".to_string()]).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.strip_prefix(root).unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["A.MP4", "b/deeper/c.Mp4", "z.mp4"]);
    }

    #[test]
    fn test_missing_root_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = find_video_files(&dir.path().join("nope"), &["mp4".to_string()]);
        assert!(matches!(result, Err(CoreError::Walkdir(_))));
    }
}
