use std::fmt;

use crate::registry::FormatKind;

// @module: Canonical subtitle model shared by every format

// @struct: Single timed subtitle entry
#[derive(Debug, Clone, PartialEq)]
pub struct SubtitleCue {
    // @field: Start time in seconds
    pub from: f64,

    // @field: End time in seconds, not checked against `from`
    pub to: f64,

    // @field: Rich text (escaped, `<br />` line breaks)
    pub text: String,
}

impl SubtitleCue {
    pub fn new(from: f64, to: f64, text: impl Into<String>) -> Self {
        SubtitleCue {
            from,
            to,
            text: text.into(),
        }
    }

    /// Build a cue from plain text, converting it to the rich representation
    pub fn from_plain(from: f64, to: f64, plain: &str) -> Self {
        Self::new(from, to, crate::rich_text::plain_to_rich(plain))
    }

    /// Plain-text view of the cue
    pub fn plain_text(&self) -> String {
        crate::rich_text::rich_to_plain(&self.text)
    }
}

/// TTAF1-only metadata
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ttaf1Extras {
    /// Document title (`ttm:title`)
    pub title: Option<String>,

    /// Copyright notice (`ttm:copyright`)
    pub copyright: Option<String>,

    /// Export template: a built-in template name or a file path
    pub template: Option<String>,
}

/// Fields that only some formats understand
#[derive(Debug, Clone, Default, PartialEq)]
pub enum FormatExtras {
    #[default]
    None,
    Ttaf1(Ttaf1Extras),
}

impl FormatExtras {
    /// Default extras for documents of the given format
    pub fn default_for(kind: FormatKind) -> Self {
        match kind {
            FormatKind::Ttaf1 => FormatExtras::Ttaf1(Ttaf1Extras::default()),
            FormatKind::SubRip | FormatKind::WebVtt | FormatKind::PlainText => FormatExtras::None,
        }
    }

    pub fn ttaf1(&self) -> Option<&Ttaf1Extras> {
        match self {
            FormatExtras::Ttaf1(extras) => Some(extras),
            FormatExtras::None => None,
        }
    }

    pub fn ttaf1_mut(&mut self) -> Option<&mut Ttaf1Extras> {
        match self {
            FormatExtras::Ttaf1(extras) => Some(extras),
            FormatExtras::None => None,
        }
    }
}

/// In-memory representation of a whole subtitle file
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubtitleDocument {
    /// Cues in parse/insertion order
    pub cues: Vec<SubtitleCue>,

    /// Language tag, free text
    pub language: Option<String>,

    /// Frames per second, used by frame-based formats
    pub framerate: Option<f64>,

    /// Format-specific metadata
    pub extras: FormatExtras,
}

impl SubtitleDocument {
    /// Create an empty document carrying the extras slot of `kind`
    pub fn new(kind: FormatKind) -> Self {
        SubtitleDocument {
            cues: Vec::new(),
            language: None,
            framerate: None,
            extras: FormatExtras::default_for(kind),
        }
    }

    pub fn with_cues(kind: FormatKind, cues: Vec<SubtitleCue>) -> Self {
        SubtitleDocument {
            cues,
            ..Self::new(kind)
        }
    }

    pub fn len(&self) -> usize {
        self.cues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cues.is_empty()
    }
}

impl fmt::Display for SubtitleDocument {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Subtitle Document")?;
        writeln!(f, "Language: {}", self.language.as_deref().unwrap_or("unknown"))?;
        match self.framerate {
            Some(fps) => writeln!(f, "Framerate: {}", fps)?,
            None => writeln!(f, "Framerate: unset")?,
        }
        writeln!(f, "Cues: {}", self.cues.len())?;
        Ok(())
    }
}
