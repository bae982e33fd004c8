/*!
 * Source encoding normalization.
 *
 * Every input is reduced to BOM-free UTF-8 with `\n` line endings before any
 * format grammar looks at it. Output may optionally get a UTF-8 BOM back.
 */

use encoding_rs::{UTF_8, mem::decode_latin1};
use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::{SubtitleError, SubtitleResult};

/// UTF-8 byte-order mark
pub const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

// Longer signatures sharing a prefix with shorter ones come first.
const BOMS: &[(&str, &[u8])] = &[
    ("UTF-8", &[0xEF, 0xBB, 0xBF]),
    ("UTF-32 (BE)", &[0x00, 0x00, 0xFE, 0xFF]),
    ("UTF-32 (LE)", &[0xFF, 0xFE, 0x00, 0x00]),
    ("UTF-16 (BE)", &[0xFE, 0xFF]),
    ("UTF-16 (LE)", &[0xFF, 0xFE]),
    ("UTF-7", b"+/v8-"),
    ("UTF-7", b"+/v8"),
    ("UTF-7", b"+/v9"),
    ("UTF-7", b"+/v+"),
    ("UTF-7", b"+/v/"),
    ("UTF-1", &[0xF7, 0x64, 0x4C]),
    ("UTF-EBCDIC", &[0xDD, 0x73, 0x66, 0x73]),
    ("SCSU", &[0x0E, 0xFE, 0xFF]),
    ("BOCU-1", &[0xFB, 0xEE, 0x28]),
    ("GB-18030", &[0x84, 0x31, 0x95, 0x33]),
];

/// Candidate source encodings, probed in the configured order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SourceEncoding {
    #[serde(rename = "utf-8")]
    Utf8,
    #[serde(rename = "latin-1")]
    Latin1,
    #[serde(rename = "ascii")]
    Ascii,
}

impl SourceEncoding {
    /// Default candidate order: UTF-8, then Latin-1, then ASCII
    pub const DEFAULT_CANDIDATES: &'static [SourceEncoding] =
        &[SourceEncoding::Utf8, SourceEncoding::Latin1, SourceEncoding::Ascii];

    fn matches(self, bytes: &[u8]) -> bool {
        match self {
            Self::Utf8 => std::str::from_utf8(bytes).is_ok(),
            // Every byte sequence is valid ISO-8859-1
            Self::Latin1 => true,
            Self::Ascii => bytes.is_ascii(),
        }
    }

    fn decode(self, bytes: &[u8]) -> Option<String> {
        match self {
            Self::Utf8 | Self::Ascii => UTF_8
                .decode_without_bom_handling_and_without_replacement(bytes)
                .map(|text| text.into_owned()),
            Self::Latin1 => Some(decode_latin1(bytes).into_owned()),
        }
    }
}

impl fmt::Display for SourceEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Utf8 => "utf-8",
            Self::Latin1 => "latin-1",
            Self::Ascii => "ascii",
        };
        write!(f, "{}", name)
    }
}

/// Remove a recognised byte-order mark from the start of the buffer.
///
/// Unrecognised leading bytes are left untouched.
pub fn strip_bom(bytes: &[u8]) -> &[u8] {
    for (name, signature) in BOMS {
        if let Some(rest) = bytes.strip_prefix(*signature) {
            debug!("Stripped {} byte-order mark", name);
            return rest;
        }
    }
    bytes
}

/// Return the first candidate encoding that matches the (BOM-free) bytes.
pub fn detect_encoding(bytes: &[u8], candidates: &[SourceEncoding]) -> Option<SourceEncoding> {
    candidates.iter().copied().find(|encoding| encoding.matches(bytes))
}

/// Decode raw file contents to BOM-free UTF-8 text.
///
/// `source_name` only feeds the error message.
pub fn to_utf8_no_bom(
    bytes: &[u8],
    candidates: &[SourceEncoding],
    source_name: &str,
) -> SubtitleResult<String> {
    let bytes = strip_bom(bytes);
    detect_encoding(bytes, candidates)
        .and_then(|encoding| {
            if encoding != SourceEncoding::Utf8 {
                debug!("Transcoding {} from {} to utf-8", source_name, encoding);
            }
            encoding.decode(bytes)
        })
        .ok_or_else(|| SubtitleError::EncodingDetection {
            file: source_name.to_string(),
            tried: candidates
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", "),
        })
}

/// Decode with the default candidates and normalize line endings.
///
/// This is the first step of every provider's import path.
pub fn normalized_text(
    bytes: &[u8],
    candidates: &[SourceEncoding],
    source_name: &str,
) -> SubtitleResult<String> {
    to_utf8_no_bom(bytes, candidates, source_name).map(|text| normalize_newlines(&text))
}

/// Lenient text view used by format detection; never fails.
pub fn detection_text(bytes: &[u8]) -> String {
    normalize_newlines(&String::from_utf8_lossy(strip_bom(bytes)))
}

/// Turn `\r\n` into `\n` and drop stray carriage returns.
pub fn normalize_newlines(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "")
}

/// Prepend the UTF-8 BOM.
pub fn add_utf8_bom(text: &str) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(UTF8_BOM.len() + text.len());
    bytes.extend_from_slice(UTF8_BOM);
    bytes.extend_from_slice(text.as_bytes());
    bytes
}

/// Encode serialized output, with the BOM when requested.
pub fn encode_output(text: &str, with_bom: bool) -> Vec<u8> {
    if with_bom {
        add_utf8_bom(text)
    } else {
        text.as_bytes().to_vec()
    }
}
