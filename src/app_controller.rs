use anyhow::{Result, anyhow};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, error, info, trace, warn};
use std::path::{Path, PathBuf};

use crate::app_config::Config;
use crate::conversion::convert_document;
use crate::errors::{SubtitleError, SubtitleResult};
use crate::file_utils::FileManager;
use crate::formats::display_name;
use crate::registry::{FormatKind, detect_format};
use crate::subtitle_document::SubtitleDocument;

// @module: Conversion facade driving detect, parse, convert, serialize and write

/// Per-run values that take precedence over the document and the configuration
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentOverrides {
    // @field: Source framerate for imports, forced framerate for exports
    pub framerate: Option<f64>,

    // @field: Language written to the output
    pub language: Option<String>,

    // @field: TTAF1 template name or path
    pub template: Option<String>,

    // @field: TTAF1 title
    pub title: Option<String>,

    // @field: TTAF1 copyright
    pub copyright: Option<String>,
}

/// Counts reported after a folder conversion
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConversionSummary {
    pub converted: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Main application controller for subtitle conversion
pub struct Controller {
    // @field: App configuration
    config: Config,

    // @field: Command line overrides
    overrides: DocumentOverrides,
}

impl Controller {
    /// Create a new controller for test purposes with default configuration
    pub fn new_for_test() -> Result<Self> {
        Self::with_config(Config::default())
    }

    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        Ok(Self {
            config,
            overrides: DocumentOverrides::default(),
        })
    }

    // @method: Attach per-run overrides
    pub fn with_overrides(mut self, overrides: DocumentOverrides) -> Self {
        self.overrides = overrides;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    fn framerate(&self) -> Option<f64> {
        self.overrides.framerate.or(self.config.framerate)
    }

    /// Detect the format of an input file and parse it
    pub fn load(&self, input_file: &Path) -> SubtitleResult<(FormatKind, SubtitleDocument)> {
        FileManager::check_input_file(input_file)?;
        self.read_document(input_file)
    }

    // Callers have already checked the input file
    fn read_document(&self, input_file: &Path) -> SubtitleResult<(FormatKind, SubtitleDocument)> {
        let contents = FileManager::read_bytes(input_file)?;
        let source_name = input_file.to_string_lossy();
        let kind = detect_format(&contents)
            .ok_or_else(|| SubtitleError::UnknownFormat(display_name(&source_name)))?;
        debug!("Reading {} as {}", input_file.display(), kind.display_name());

        let mut options = self.config.parse_options();
        options.framerate = self.framerate();
        let document = kind.provider().parse(&contents, &source_name, &options)?;
        trace!("{}", document);

        Ok((kind, document))
    }

    /// Convert one file, returning the written path or the first error
    pub fn try_convert(
        &self,
        input_file: &Path,
        output_file: &Path,
        output_format: &str,
        include_bom: bool,
    ) -> SubtitleResult<PathBuf> {
        FileManager::check_input_file(input_file)?;
        let target = FormatKind::from_id(output_format)
            .ok_or_else(|| SubtitleError::UnknownOutputFormat(output_format.to_string()))?;

        let (source, document) = self.read_document(input_file)?;
        let mut converted = convert_document(&document, target);
        self.apply_overrides(&mut converted);

        let bytes = target
            .provider()
            .serialize(&converted, &self.config.export_options(include_bom))?;
        FileManager::write_bytes(output_file, &bytes)?;

        info!(
            "Converted {} ({}) to {} ({}), {} cues",
            input_file.display(),
            source.display_name(),
            output_file.display(),
            target.display_name(),
            converted.len()
        );
        Ok(output_file.to_path_buf())
    }

    /// Convert one file; failures are logged, never raised
    pub fn convert(&self, input_file: &Path, output_file: &Path, output_format: &str, include_bom: bool) -> bool {
        match self.try_convert(input_file, output_file, output_format, include_bom) {
            Ok(_) => true,
            Err(e) => {
                error!("{}", e);
                false
            }
        }
    }

    // Command line values win over document values, which win over configuration defaults
    fn apply_overrides(&self, document: &mut SubtitleDocument) {
        if let Some(fps) = self.framerate() {
            document.framerate = Some(fps);
        }
        if let Some(language) = &self.overrides.language {
            document.language = Some(language.clone());
        }

        let ttaf1 = &self.config.ttaf1;
        let overrides = &self.overrides;
        if let Some(extras) = document.extras.ttaf1_mut() {
            extras.template = overrides
                .template
                .clone()
                .or_else(|| extras.template.take())
                .or_else(|| ttaf1.template.clone());
            extras.title = overrides
                .title
                .clone()
                .or_else(|| extras.title.take())
                .or_else(|| ttaf1.title.clone());
            extras.copyright = overrides
                .copyright
                .clone()
                .or_else(|| extras.copyright.take())
                .or_else(|| ttaf1.copyright.clone());
        }
    }

    // Format duration in a human-readable format
    fn format_duration(duration: std::time::Duration) -> String {
        let total_seconds = duration.as_secs();
        let hours = total_seconds / 3600;
        let minutes = (total_seconds % 3600) / 60;
        let seconds = total_seconds % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}.{:03}s", seconds, duration.subsec_millis())
        }
    }

    /// Convert every subtitle file under `input_dir` into `output_dir`
    /// Files whose output would overwrite their own input are skipped
    pub fn convert_folder(
        &self,
        input_dir: &Path,
        output_dir: &Path,
        output_format: &str,
        include_bom: bool,
    ) -> Result<ConversionSummary> {
        let start_time = std::time::Instant::now();

        if !FileManager::dir_exists(input_dir) {
            return Err(anyhow!("Input directory does not exist: {:?}", input_dir));
        }
        let target = FormatKind::from_id(output_format)
            .ok_or_else(|| SubtitleError::UnknownOutputFormat(output_format.to_string()))?;

        let subtitle_files = FileManager::find_subtitle_files(input_dir)?;
        if subtitle_files.is_empty() {
            return Err(anyhow!("No subtitle files found in directory: {:?}", input_dir));
        }
        FileManager::ensure_dir(output_dir)?;

        let folder_pb = ProgressBar::new(subtitle_files.len() as u64);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files ({percent}%) {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        folder_pb.set_style(style.progress_chars("█▓▒░"));
        folder_pb.set_message("Converting files");

        let mut summary = ConversionSummary::default();

        for input_file in &subtitle_files {
            let file_name = input_file
                .file_name()
                .map(|f| f.to_string_lossy().to_string())
                .unwrap_or_else(|| "unknown".to_string());
            folder_pb.set_message(format!("Converting: {}", file_name));

            let output_file = FileManager::generate_output_path(input_file, output_dir, target.extension());
            if output_file == *input_file {
                warn!("Skipping {}, output would overwrite the input", file_name);
                summary.skipped += 1;
                folder_pb.inc(1);
                continue;
            }

            match self.try_convert(input_file, &output_file, output_format, include_bom) {
                Ok(_) => summary.converted += 1,
                Err(e) => {
                    error!("Error converting file {}: {}", file_name, e);
                    summary.failed += 1;
                }
            }
            folder_pb.inc(1);
        }

        folder_pb.finish_with_message("Folder conversion complete");

        info!(
            "Folder conversion completed: {} converted, {} skipped, {} errors in {}",
            summary.converted,
            summary.skipped,
            summary.failed,
            Self::format_duration(start_time.elapsed())
        );

        Ok(summary)
    }
}
