/*!
 * Format providers.
 *
 * Each on-disk format has one provider implementing `SubtitleFormat`:
 * - `subrip`: SubRip (`.srt`)
 * - `webvtt`: WebVTT (`.vtt`)
 * - `ttaf1`: TTAF1 / TTML (`.xml`), template based export
 * - `plain_text`: frame-timecoded plain text (`.txt`)
 *
 * Providers are stateless: parsing is a function of (bytes, options) and
 * serialization a function of (document, options).
 */

use std::fmt::Debug;
use std::path::{Path, PathBuf};

use crate::encoding::SourceEncoding;
use crate::errors::{SubtitleError, SubtitleResult};
use crate::registry::FormatKind;
use crate::subtitle_document::SubtitleDocument;

pub mod plain_text;
pub mod subrip;
pub mod ttaf1;
pub mod webvtt;

/// Options applied while importing a file
#[derive(Debug, Clone, PartialEq)]
pub struct ParseOptions {
    /// Framerate assumed by frame-based formats that do not declare one
    pub framerate: Option<f64>,

    /// Candidate source encodings, in probe order
    pub encodings: Vec<SourceEncoding>,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            framerate: None,
            encodings: SourceEncoding::DEFAULT_CANDIDATES.to_vec(),
        }
    }
}

impl ParseOptions {
    pub fn with_framerate(mut self, framerate: f64) -> Self {
        self.framerate = Some(framerate);
        self
    }
}

/// Options applied while exporting a document
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExportOptions {
    /// Prepend a UTF-8 byte-order mark
    pub include_bom: bool,

    /// Directory searched for named TTAF1 templates
    pub template_dir: Option<PathBuf>,
}

impl ExportOptions {
    pub fn with_bom(mut self, include_bom: bool) -> Self {
        self.include_bom = include_bom;
        self
    }
}

/// Common trait for all subtitle format providers
///
/// Implementations must be usable from several threads at once, so they hold
/// no per-conversion state.
pub trait SubtitleFormat: Send + Sync + Debug {
    /// Format handled by this provider
    fn kind(&self) -> FormatKind;

    /// Whether the raw file contents look like this format
    fn detect(&self, contents: &[u8]) -> bool;

    /// Parse raw file contents into a document
    ///
    /// # Arguments
    /// * `contents` - Raw file bytes, any supported encoding
    /// * `source_name` - File name used in error messages
    /// * `options` - Import options
    ///
    /// # Returns
    /// * `SubtitleResult<SubtitleDocument>` - The parsed document or the first structural error
    fn parse(
        &self,
        contents: &[u8],
        source_name: &str,
        options: &ParseOptions,
    ) -> SubtitleResult<SubtitleDocument>;

    /// Serialize a document to file bytes
    fn serialize(&self, document: &SubtitleDocument, options: &ExportOptions) -> SubtitleResult<Vec<u8>>;

    /// Extension of files written by this provider, without the dot
    fn file_extension(&self) -> &'static str {
        self.kind().extension()
    }
}

/// Error returned when a provider does not recognise the file it was asked to parse
pub(crate) fn invalid_format(kind: FormatKind, source_name: &str) -> SubtitleError {
    SubtitleError::InvalidFormat {
        format: kind.display_name(),
        file: display_name(source_name),
    }
}

/// Base name of a path, falling back to the path itself
pub(crate) fn display_name(source: &str) -> String {
    Path::new(source)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| source.to_string())
}

/// Parse a captured integer field; grammars only capture ASCII digits.
pub(crate) fn digits(field: Option<regex::Match<'_>>) -> u64 {
    field
        .and_then(|value| value.as_str().parse().ok())
        .unwrap_or(0)
}
