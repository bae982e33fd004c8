/*!
 * SubRip (`.srt`) provider.
 *
 * A cue block is an index line, a `HH:MM:SS,mmm --> HH:MM:SS,mmm` timing
 * line and one or more text lines, ended by a blank line or end of input.
 */

use once_cell::sync::Lazy;
use regex::Regex;

use crate::encoding::{detection_text, encode_output, normalized_text};
use crate::errors::SubtitleResult;
use crate::formats::{ExportOptions, ParseOptions, SubtitleFormat, digits, display_name, invalid_format};
use crate::registry::FormatKind;
use crate::subtitle_document::{SubtitleCue, SubtitleDocument};
use crate::timecode::{clock_to_seconds, seconds_to_clock};

static SUBRIP_CUE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"(?m)^([0-9]+)[ \t]*\n",
        r"([0-9]{2,}):([0-9]{2}):([0-9]{2}),([0-9]{3}) --> ([0-9]{2,}):([0-9]{2}):([0-9]{2}),([0-9]{3})[ \t]*\n",
        r"((?:[^\n]+\n)*[^\n]+)(?:\n|\z)",
    ))
    .unwrap()
});

/// SubRip provider
#[derive(Debug, Clone, Copy, Default)]
pub struct SubRipFormat;

impl SubtitleFormat for SubRipFormat {
    fn kind(&self) -> FormatKind {
        FormatKind::SubRip
    }

    fn detect(&self, contents: &[u8]) -> bool {
        SUBRIP_CUE.is_match(&detection_text(contents))
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
        let cues: Vec<SubtitleCue> = SUBRIP_CUE
            .captures_iter(&text)
            .map(|caps| {
                let from = clock_to_seconds(digits(caps.get(2)), digits(caps.get(3)), digits(caps.get(4)), &caps[5]);
                let to = clock_to_seconds(digits(caps.get(6)), digits(caps.get(7)), digits(caps.get(8)), &caps[9]);
                SubtitleCue::from_plain(from, to, caps[10].trim_matches([' ', '\t', '\r', '\n']))
            })
            .collect();

        if cues.is_empty() {
            return Err(invalid_format(self.kind(), source_name));
        }

        Ok(SubtitleDocument::with_cues(self.kind(), cues))
    }

    fn serialize(&self, document: &SubtitleDocument, options: &ExportOptions) -> SubtitleResult<Vec<u8>> {
        let mut srt = String::new();

        for (index, cue) in document.cues.iter().enumerate() {
            srt.push_str(&format!(
                "{}\n{} --> {}\n{}\n\n",
                index + 1,
                seconds_to_clock(cue.from, ',', 3),
                seconds_to_clock(cue.to, ',', 3),
                cue.plain_text()
            ));
        }

        Ok(encode_output(&srt, options.include_bom))
    }
}
