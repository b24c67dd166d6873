/*!
 * Tests for file utility functions
 */

use anyhow::Result;
use std::fs;
use std::path::Path;

use wikiscript::file_utils::FileManager;

use crate::common;

/// Test finding saved pages, recursively and in sorted order
#[test]
fn test_find_page_files_withMixedFiles_shouldReturnSortedPages() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let root = temp_dir.path();

    common::create_test_file(root, "b_episode.html", "<p></p>")?;
    common::create_test_file(root, "a_episode.HTM", "<p></p>")?;
    common::create_test_file(root, "notes.txt", "not a page")?;
    common::create_test_file(root, "series2/c_episode.htm", "<p></p>")?;

    let pages = FileManager::find_page_files(root)?;
    let names: Vec<String> = pages
        .iter()
        .map(|p| p.strip_prefix(root).unwrap().to_string_lossy().replace('\\', "/"))
        .collect();

    assert_eq!(names, vec!["a_episode.HTM", "b_episode.html", "series2/c_episode.htm"]);
    Ok(())
}

#[test]
fn test_episode_name_from_path_shouldUseStemWithSpaces() {
    assert_eq!(
        FileManager::episode_name_from_path(Path::new("/saved/Series_1_Episode_2.html")),
        "Series 1 Episode 2"
    );
    assert_eq!(FileManager::episode_name_from_path(Path::new("Pilot.htm")), "Pilot");
}

#[test]
fn test_is_page_file_shouldCheckExtension() {
    assert!(FileManager::is_page_file("a.html"));
    assert!(FileManager::is_page_file("a.HTML"));
    assert!(!FileManager::is_page_file("a.xhtml"));
    assert!(!FileManager::is_page_file("html"));
}

/// Test writing into a directory that does not exist yet
#[test]
fn test_write_to_file_withMissingParent_shouldCreateIt() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("out/nested/show.json");

    FileManager::write_to_file(&path, "{}")?;

    assert!(FileManager::file_exists(&path));
    assert!(FileManager::dir_exists(temp_dir.path().join("out/nested")));
    assert_eq!(fs::read_to_string(&path)?, "{}");
    Ok(())
}

#[test]
fn test_read_to_string_withMissingFile_shouldFail() {
    let temp_dir = common::create_temp_dir().unwrap();
    assert!(FileManager::read_to_string(temp_dir.path().join("missing.html")).is_err());
}
