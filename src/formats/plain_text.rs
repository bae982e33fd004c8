/*!
 * Frame-timecoded plain text (`.txt`) provider.
 *
 * Each cue starts with `N) HH:MM:SS:FF HH:MM:SS:FF`, anything after the
 * second timecode on that line is ignored, and text lines follow until a
 * blank line or end of input.
 */

use once_cell::sync::Lazy;
use regex::Regex;

use crate::encoding::{detection_text, encode_output, normalized_text};
use crate::errors::SubtitleResult;
use crate::formats::{ExportOptions, ParseOptions, SubtitleFormat, digits, display_name, invalid_format};
use crate::registry::FormatKind;
use crate::subtitle_document::{SubtitleCue, SubtitleDocument};
use crate::timecode::{FramerateUse, frame_clock_to_seconds, framerate_or_default, seconds_to_frame_clock};

static PLAIN_TEXT_CUE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"(?m)^([0-9]+)\)[ \t]*",
        r"([0-9]{2,}):([0-9]{2}):([0-9]{2}):([0-9]{2})[ \t]+([0-9]{2,}):([0-9]{2}):([0-9]{2}):([0-9]{2})[^\n]*\n",
        r"((?:[^\n]+\n)*[^\n]+)(?:\n|\z)",
    ))
    .unwrap()
});

/// Plain text provider
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextFormat;

impl SubtitleFormat for PlainTextFormat {
    fn kind(&self) -> FormatKind {
        FormatKind::PlainText
    }

    fn detect(&self, contents: &[u8]) -> bool {
        PLAIN_TEXT_CUE.is_match(&detection_text(contents))
    }

    fn parse(
        &self,
        contents: &[u8],
        source_name: &str,
        options: &ParseOptions,
    ) -> SubtitleResult<SubtitleDocument> {
        if !self.detect(contents) {
            return Err(invalid_format(self.kind(), source_name));
        }

        let text = normalized_text(contents, &options.encodings, &display_name(source_name))?;
        let fps = framerate_or_default(options.framerate, FramerateUse::Import);

        let cues: Vec<SubtitleCue> = PLAIN_TEXT_CUE
            .captures_iter(&text)
            .map(|caps| {
                let from = frame_clock_to_seconds(
                    digits(caps.get(2)),
                    digits(caps.get(3)),
                    digits(caps.get(4)),
                    digits(caps.get(5)),
                    fps,
                );
                let to = frame_clock_to_seconds(
                    digits(caps.get(6)),
                    digits(caps.get(7)),
                    digits(caps.get(8)),
                    digits(caps.get(9)),
                    fps,
                );
                SubtitleCue::from_plain(from, to, caps[10].trim_matches([' ', '\t', '\r', '\n']))
            })
            .collect();

        if cues.is_empty() {
            return Err(invalid_format(self.kind(), source_name));
        }

        let mut document = SubtitleDocument::with_cues(self.kind(), cues);
        // Only a caller-supplied rate is recorded; the default stays implicit
        document.framerate = options.framerate.filter(|fps| fps.is_finite() && *fps > 0.0);
        Ok(document)
    }

    fn serialize(&self, document: &SubtitleDocument, options: &ExportOptions) -> SubtitleResult<Vec<u8>> {
        let fps = framerate_or_default(document.framerate, FramerateUse::Export);
        let mut txt = String::new();

        for (index, cue) in document.cues.iter().enumerate() {
            txt.push_str(&format!(
                "{}) {} {}\n{}\n\n",
                index + 1,
                seconds_to_frame_clock(cue.from, fps, ':'),
                seconds_to_frame_clock(cue.to, fps, ':'),
                cue.plain_text()
            ));
        }

        Ok(encode_output(&txt, options.include_bom))
    }
}
