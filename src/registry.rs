/*!
 * Provider registry and format auto-detection.
 *
 * The set of formats is closed. Detection probes providers in the fixed
 * order of `FormatKind::ALL` and the first match wins, so a file matching
 * several grammars always resolves to the earliest format.
 */

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use log::debug;

use crate::errors::{SubtitleError, SubtitleResult};
use crate::formats::SubtitleFormat;
use crate::formats::plain_text::PlainTextFormat;
use crate::formats::subrip::SubRipFormat;
use crate::formats::ttaf1::Ttaf1Format;
use crate::formats::webvtt::WebVttFormat;

static SUBRIP: SubRipFormat = SubRipFormat;
static WEBVTT: WebVttFormat = WebVttFormat;
static TTAF1: Ttaf1Format = Ttaf1Format;
static PLAIN_TEXT: PlainTextFormat = PlainTextFormat;

/// Supported subtitle formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormatKind {
    SubRip,
    WebVtt,
    Ttaf1,
    PlainText,
}

impl FormatKind {
    /// Every format, in detection probe order
    pub const ALL: [FormatKind; 4] = [
        FormatKind::SubRip,
        FormatKind::WebVtt,
        FormatKind::Ttaf1,
        FormatKind::PlainText,
    ];

    /// Identifier used in configuration and on the command line
    pub fn id(self) -> &'static str {
        match self {
            FormatKind::SubRip => "srt",
            FormatKind::WebVtt => "webvtt",
            FormatKind::Ttaf1 => "ttaf1",
            FormatKind::PlainText => "txt",
        }
    }

    /// Extension of exported files, without the dot
    pub fn extension(self) -> &'static str {
        match self {
            FormatKind::SubRip => "srt",
            FormatKind::WebVtt => "vtt",
            FormatKind::Ttaf1 => "xml",
            FormatKind::PlainText => "txt",
        }
    }

    /// Name used in user-facing messages
    pub fn display_name(self) -> &'static str {
        match self {
            FormatKind::SubRip => "SubRip",
            FormatKind::WebVtt => "WebVTT",
            FormatKind::Ttaf1 => "TTAF1",
            FormatKind::PlainText => "plain text",
        }
    }

    /// The stateless provider for this format
    pub fn provider(self) -> &'static dyn SubtitleFormat {
        match self {
            FormatKind::SubRip => &SUBRIP,
            FormatKind::WebVtt => &WEBVTT,
            FormatKind::Ttaf1 => &TTAF1,
            FormatKind::PlainText => &PLAIN_TEXT,
        }
    }

    /// Look a format up by identifier, case-insensitively
    pub fn from_id(id: &str) -> Option<FormatKind> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.id().eq_ignore_ascii_case(id.trim()))
    }
}

impl fmt::Display for FormatKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id())
    }
}

impl FromStr for FormatKind {
    type Err = SubtitleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_id(s).ok_or_else(|| SubtitleError::UnknownOutputFormat(s.to_string()))
    }
}

/// Ordered mapping of format identifier to format kind
pub fn implementations() -> Vec<(&'static str, FormatKind)> {
    FormatKind::ALL.iter().map(|kind| (kind.id(), *kind)).collect()
}

/// Probe every provider in order on in-memory contents
pub fn detect_format(contents: &[u8]) -> Option<FormatKind> {
    FormatKind::ALL
        .into_iter()
        .find(|kind| kind.provider().detect(contents))
}

/// Read a file once and return the first format whose detection accepts it
pub fn detect_provider_for_file(path: &Path) -> SubtitleResult<Option<FormatKind>> {
    let contents = std::fs::read(path)?;
    let detected = detect_format(&contents);

    match detected {
        Some(kind) => debug!("Detected {} format for {}", kind.display_name(), path.display()),
        None => debug!("No format recognised for {}", path.display()),
    }

    Ok(detected)
}
