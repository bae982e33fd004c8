use anyhow::{Context, Result, anyhow};
use log::{LevelFilter, warn};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::encoding::SourceEncoding;
use crate::file_utils::FileManager;
use crate::formats::{ExportOptions, ParseOptions};
use crate::registry::FormatKind;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Config {
    /// Default output format id (`srt`, `webvtt`, `ttaf1`, `txt`)
    #[serde(default = "default_output_format")]
    pub output_format: String,

    /// Prepend a UTF-8 BOM to written files
    #[serde(default)]
    pub include_bom: bool,

    /// Framerate assumed for frame-based imports and forced on export
    #[serde(default)]
    pub framerate: Option<f64>,

    /// Candidate source encodings, in probe order
    #[serde(default = "default_encodings")]
    pub encodings: Vec<SourceEncoding>,

    /// TTAF1 export settings
    #[serde(default)]
    pub ttaf1: Ttaf1Config,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// TTAF1 export configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct Ttaf1Config {
    // @field: Built-in template name or template file path
    #[serde(default)]
    pub template: Option<String>,

    // @field: Directory searched for named templates
    #[serde(default)]
    pub template_dir: Option<PathBuf>,

    // @field: Title used when the document has none
    #[serde(default)]
    pub title: Option<String>,

    // @field: Copyright used when the document has none
    #[serde(default)]
    pub copyright: Option<String>,
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    // @returns: Matching log crate filter
    pub fn to_level_filter(self) -> LevelFilter {
        match self {
            Self::Error => LevelFilter::Error,
            Self::Warn => LevelFilter::Warn,
            Self::Info => LevelFilter::Info,
            Self::Debug => LevelFilter::Debug,
            Self::Trace => LevelFilter::Trace,
        }
    }
}

fn default_output_format() -> String {
    FormatKind::SubRip.id().to_string()
}

fn default_encodings() -> Vec<SourceEncoding> {
    SourceEncoding::DEFAULT_CANDIDATES.to_vec()
}

impl Config {
    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if FormatKind::from_id(&self.output_format).is_none() {
            return Err(anyhow!(
                "Unknown output format '{}', expected one of: {}",
                self.output_format,
                FormatKind::ALL.map(|kind| kind.id()).join(", ")
            ));
        }

        if let Some(fps) = self.framerate {
            if !fps.is_finite() || fps <= 0.0 {
                return Err(anyhow!("Framerate must be a positive number, got {}", fps));
            }
        }

        if self.encodings.is_empty() {
            return Err(anyhow!("At least one source encoding is required"));
        }

        if let Some(dir) = &self.ttaf1.template_dir {
            if !dir.is_dir() {
                return Err(anyhow!("TTAF1 template directory does not exist: {:?}", dir));
            }
        }

        Ok(())
    }

    /// Default output format as a kind
    pub fn output_kind(&self) -> Result<FormatKind> {
        FormatKind::from_id(&self.output_format)
            .ok_or_else(|| anyhow!("Unknown output format '{}'", self.output_format))
    }

    /// Import options derived from this configuration
    pub fn parse_options(&self) -> ParseOptions {
        ParseOptions {
            framerate: self.framerate,
            encodings: self.encodings.clone(),
        }
    }

    /// Export options derived from this configuration
    pub fn export_options(&self, include_bom: bool) -> ExportOptions {
        ExportOptions {
            include_bom: include_bom || self.include_bom,
            template_dir: self.ttaf1.template_dir.clone(),
        }
    }

    /// Load a configuration file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).with_context(|| format!("Failed to open config file: {:?}", path))?;
        let reader = BufReader::new(file);
        serde_json::from_reader(reader).with_context(|| format!("Failed to parse config file: {:?}", path))
    }

    /// Save the configuration as pretty JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("Failed to serialize config to JSON")?;
        FileManager::write_to_file(path.as_ref(), &json)
            .with_context(|| format!("Failed to write config file: {:?}", path.as_ref()))
    }

    /// Load the configuration, writing the defaults first when the file is missing
    pub fn load_or_create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            return Self::from_file(path);
        }

        warn!("Config file not found at {:?}, creating default config.", path);
        let config = Config::default();
        config.save(path)?;
        Ok(config)
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            output_format: default_output_format(),
            include_bom: false,
            framerate: None,
            encodings: default_encodings(),
            ttaf1: Ttaf1Config::default(),
            log_level: LogLevel::default(),
        }
    }
}
