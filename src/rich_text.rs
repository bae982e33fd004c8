/*!
 * Conversion between plain text and the rich (inline HTML) cue representation.
 *
 * Cue text inside a `SubtitleDocument` is always rich: markup-significant
 * characters are entity-escaped and line breaks are `<br />` markers.
 *
 * `rich_to_plain(plain_to_rich(x))` is a lossy normalization, not a
 * round-trip: runs of whitespace collapse to a single space and surrounding
 * whitespace is trimmed.
 */

use once_cell::sync::Lazy;
use quick_xml::escape::{escape, unescape};
use regex::{Captures, Regex};
use std::borrow::Cow;

/// Line-break marker emitted by `plain_to_rich`
pub const LINE_BREAK: &str = "<br />";

static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\r\n\t ]+").unwrap());

static PARAGRAPH_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)</?p[^>]*>").unwrap());

static BREAK_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)<(br|hr)[^>]*>").unwrap());

static COMMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<!--.*?-->").unwrap());

static ANY_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").unwrap());

static ENTITY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"&(?:#[0-9]+|#[xX][0-9a-fA-F]+|[A-Za-z][A-Za-z0-9]*);").unwrap()
});

/// Escape `&`, `<`, `>`, `'` and `"` as entities.
pub fn escape_html(text: &str) -> Cow<'_, str> {
    escape(text)
}

/// Convert plain text to rich text: escape, then turn newlines into `<br />`.
///
/// No paragraph wrapping is added.
pub fn plain_to_rich(text: &str) -> String {
    escape_html(text).replace('\n', LINE_BREAK)
}

/// Reduce rich text (or an inline XML fragment) to plain text.
///
/// Whitespace runs collapse to one space, paragraph boundaries and
/// `<br>`/`<hr>` become newlines, other tags are stripped, entities are
/// decoded and surrounding whitespace is trimmed.
pub fn rich_to_plain(rich: &str) -> String {
    let text = WHITESPACE_RUN.replace_all(rich, " ");
    let text = PARAGRAPH_TAG.replace_all(&text, "\n");
    let text = BREAK_TAG.replace_all(&text, "\n");
    let text = COMMENT.replace_all(&text, "");
    let text = ANY_TAG.replace_all(&text, "");
    let text = decode_entities(&text);

    text.trim_matches(|c| matches!(c, ' ' | '\t' | '\r' | '\n'))
        .to_string()
}

/// Decode XML and common HTML entities; unknown entities are left as they are.
pub fn decode_entities(text: &str) -> Cow<'_, str> {
    ENTITY.replace_all(text, |caps: &Captures| {
        let entity = &caps[0];
        match unescape(entity) {
            Ok(decoded) => decoded.into_owned(),
            Err(_) => html_entity(&entity[1..entity.len() - 1])
                .map(str::to_string)
                .unwrap_or_else(|| entity.to_string()),
        }
    })
}

// HTML named entities outside the XML predefined set that show up in subtitles
fn html_entity(name: &str) -> Option<&'static str> {
    let decoded = match name {
        "nbsp" => "\u{a0}",
        "copy" => "\u{a9}",
        "reg" => "\u{ae}",
        "trade" => "\u{2122}",
        "deg" => "\u{b0}",
        "middot" => "\u{b7}",
        "hellip" => "\u{2026}",
        "ndash" => "\u{2013}",
        "mdash" => "\u{2014}",
        "lsquo" => "\u{2018}",
        "rsquo" => "\u{2019}",
        "ldquo" => "\u{201c}",
        "rdquo" => "\u{201d}",
        "laquo" => "\u{ab}",
        "raquo" => "\u{bb}",
        "euro" => "\u{20ac}",
        "iexcl" => "\u{a1}",
        "iquest" => "\u{bf}",
        _ => return None,
    };
    Some(decoded)
}
