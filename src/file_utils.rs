use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::errors::{SubtitleError, SubtitleResult};
use crate::registry::FormatKind;

// @module: File and directory utilities

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: Directory existence
    pub fn dir_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().is_dir()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.as_os_str().is_empty() && !path.exists() {
            fs::create_dir_all(path)
                .with_context(|| format!("Failed to create directory: {:?}", path))?;
        }
        Ok(())
    }

    // @checks: Conversion input precondition (exists, regular file)
    pub fn check_input_file<P: AsRef<Path>>(path: P) -> SubtitleResult<()> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(SubtitleError::MissingFile(path.to_path_buf()));
        }
        if !path.is_file() {
            return Err(SubtitleError::NotAFile(path.to_path_buf()));
        }
        Ok(())
    }

    // @generates: Output path for a converted subtitle
    // @params: input_file, output_dir, extension
    pub fn generate_output_path<P1: AsRef<Path>, P2: AsRef<Path>>(
        input_file: P1,
        output_dir: P2,
        extension: &str,
    ) -> PathBuf {
        let stem = input_file.as_ref().file_stem().unwrap_or_default();

        let mut output_filename = stem.to_string_lossy().to_string();
        output_filename.push('.');
        output_filename.push_str(extension.trim_start_matches('.'));

        output_dir.as_ref().join(output_filename)
    }

    /// Every regular file under `dir` whose extension belongs to a supported format
    pub fn find_subtitle_files<P: AsRef<Path>>(dir: P) -> Result<Vec<PathBuf>> {
        let mut result = Vec::new();

        for entry in WalkDir::new(dir.as_ref()).follow_links(true).sort_by_file_name() {
            let entry = entry.context("Failed to read directory entry")?;
            let path = entry.path();

            let supported = path.extension().is_some_and(|ext| {
                let ext = ext.to_string_lossy();
                FormatKind::ALL
                    .iter()
                    .any(|kind| kind.extension().eq_ignore_ascii_case(&ext))
            });
            if path.is_file() && supported {
                result.push(path.to_path_buf());
            }
        }

        Ok(result)
    }

    /// Read a whole file into memory
    pub fn read_bytes<P: AsRef<Path>>(path: P) -> SubtitleResult<Vec<u8>> {
        Ok(fs::read(path.as_ref())?)
    }

    /// Write bytes to a file, creating the parent directory when needed
    pub fn write_bytes<P: AsRef<Path>>(path: P, content: &[u8]) -> SubtitleResult<()> {
        let path = path.as_ref();
        let write_failure = |reason: String| SubtitleError::WriteFailure {
            path: path.to_path_buf(),
            reason,
        };

        if let Some(parent) = path.parent() {
            Self::ensure_dir(parent).map_err(|e| write_failure(format!("{:#}", e)))?;
        }

        fs::write(path, content).map_err(|e| write_failure(e.to_string()))
    }

    /// Write a string to a file
    pub fn write_to_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        if let Some(parent) = path.as_ref().parent() {
            Self::ensure_dir(parent)?;
        }

        fs::write(&path, content)
            .with_context(|| format!("Failed to write to file: {:?}", path.as_ref()))?;

        Ok(())
    }
}
