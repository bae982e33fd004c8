/*!
 * Tests for file utility functions
 */

use anyhow::Result;
use std::fs;
use std::path::PathBuf;
use subconv::SubtitleError;
use subconv::file_utils::FileManager;
use crate::common;

/// Test generating an output path from an input file
#[test]
fn test_generate_output_path_withExtension_shouldReplaceExtension() {
    let input_file = PathBuf::from("/path/to/movie.srt");
    let output_dir = PathBuf::from("/output/dir");

    let output_path = FileManager::generate_output_path(&input_file, &output_dir, "vtt");
    assert_eq!(output_path, PathBuf::from("/output/dir/movie.vtt"));

    let dotted = FileManager::generate_output_path(&input_file, &output_dir, ".xml");
    assert_eq!(dotted, PathBuf::from("/output/dir/movie.xml"));
}

/// Test the conversion input precondition
#[test]
fn test_check_input_file_withMissingAndDirectory_shouldFailDistinctly() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let missing = temp_dir.path().join("missing.srt");

    let err = FileManager::check_input_file(&missing).unwrap_err();
    assert!(matches!(err, SubtitleError::MissingFile(_)));
    assert_eq!(err.to_string(), format!("{} does not exist.", missing.display()));

    let err = FileManager::check_input_file(temp_dir.path()).unwrap_err();
    assert!(matches!(err, SubtitleError::NotAFile(_)));
    assert!(err.to_string().ends_with("is not a file."));

    let file = common::create_test_subtitle(temp_dir.path(), "ok.srt")?;
    assert!(FileManager::check_input_file(&file).is_ok());
    Ok(())
}

/// Test finding subtitle files of every supported extension, sorted by name
#[test]
fn test_find_subtitle_files_withMixedDirectory_shouldReturnSupportedOnly() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path();

    common::create_test_file(dir, "b.vtt", common::VTT_SAMPLE)?;
    common::create_test_file(dir, "a.srt", common::SRT_SAMPLE)?;
    common::create_test_file(dir, "c.XML", common::TTAF1_SAMPLE)?;
    common::create_test_file(dir, "d.txt", common::TXT_SAMPLE)?;
    common::create_test_file(dir, "notes.md", "# notes")?;
    fs::create_dir(dir.join("nested"))?;
    common::create_test_file(&dir.join("nested"), "e.srt", common::SRT_SAMPLE)?;

    let files = FileManager::find_subtitle_files(dir)?;
    let names: Vec<String> = files
        .iter()
        .map(|path| path.file_name().unwrap().to_string_lossy().to_string())
        .collect();

    assert_eq!(names, vec!["a.srt", "b.vtt", "c.XML", "d.txt", "e.srt"]);
    Ok(())
}

/// Test that writing creates missing parent directories
#[test]
fn test_write_bytes_withMissingParent_shouldCreateIt() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let target = temp_dir.path().join("deep").join("er").join("out.srt");

    FileManager::write_bytes(&target, b"data")?;
    assert_eq!(fs::read(&target)?, b"data");
    assert_eq!(FileManager::read_bytes(&target)?, b"data".to_vec());
    Ok(())
}

/// Test that an unwritable destination yields a write failure
#[test]
fn test_write_bytes_withFileAsParent_shouldReportWriteFailure() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let blocker = common::create_test_file(temp_dir.path(), "blocker", "x")?;

    let err = FileManager::write_bytes(blocker.join("out.srt"), b"data").unwrap_err();
    assert!(matches!(err, SubtitleError::WriteFailure { .. }));
    assert!(err.to_string().starts_with("Could not write file"));
    Ok(())
}

/// Test that string writes create the parent directory
#[test]
fn test_write_to_file_withMissingParent_shouldCreateIt() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("sub").join("text.txt");

    FileManager::write_to_file(&path, "hello")?;
    assert!(FileManager::dir_exists(temp_dir.path().join("sub")));
    assert_eq!(fs::read_to_string(&path)?, "hello");
    Ok(())
}
