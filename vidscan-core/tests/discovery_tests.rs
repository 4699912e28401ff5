// vidscan-core/tests/discovery_tests.rs

use std::fs::{self, File};

use tempfile::tempdir;
use vidscan_core::find_video_files;

#[test]
fn test_find_video_files_multiple_extensions() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let root = dir.path();

    fs::create_dir_all(root.join("season 1"))?;
    File::create(root.join("season 1").join("episode.MKV"))?;
    File::create(root.join("movie.mp4"))?;
    File::create(root.join("trailer.mov"))?;
    File::create(root.join("poster.jpg"))?;

    let files = find_video_files(root, &["mp4".to_string(), ".mkv".to_string()])?;
    let names: Vec<_> = files
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["movie.mp4", "episode.MKV"]);

    dir.close()?;
    Ok(())
}

#[test]
fn test_find_video_files_empty_tree() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    fs::create_dir(dir.path().join("empty"))?;
    File::create(dir.path().join("document.txt"))?;

    let files = find_video_files(dir.path(), &["mp4".to_string()])?;
    assert!(files.is_empty());
    Ok(())
}

#[cfg(unix)]
#[test]
fn test_find_video_files_keeps_symlinked_files() -> Result<(), Box<dyn std::error::Error>> {
    let library = tempdir()?;
    let storage = tempdir()?;
    File::create(library.path().join("plain.mp4"))?;
    File::create(storage.path().join("stored.mp4"))?;
    std::os::unix::fs::symlink(storage.path().join("stored.mp4"), library.path().join("link.mp4"))?;
    // Dangling links are not files.
    std::os::unix::fs::symlink(storage.path().join("gone.mp4"), library.path().join("dangling.mp4"))?;

    let files = find_video_files(library.path(), &["mp4".to_string()])?;
    assert_eq!(files, vec![library.path().join("link.mp4"), library.path().join("plain.mp4")]);
    Ok(())
}

#[cfg(unix)]
#[test]
fn test_find_video_files_does_not_descend_symlinked_dirs() -> Result<(), Box<dyn std::error::Error>> {
    let library = tempdir()?;
    let storage = tempdir()?;
    fs::create_dir(storage.path().join("season"))?;
    File::create(storage.path().join("season/episode.mp4"))?;
    std::os::unix::fs::symlink(storage.path().join("season"), library.path().join("season"))?;

    let files = find_video_files(library.path(), &["mp4".to_string()])?;
    assert!(files.is_empty(), "{files:?}");
    Ok(())
}
