/*!
 * Transfer of a document between formats.
 *
 * Cues, language and framerate always carry over. Format extras only carry
 * over when the target format understands them; otherwise the target starts
 * from its own defaults.
 */

use crate::registry::FormatKind;
use crate::subtitle_document::{FormatExtras, SubtitleDocument};

/// Extras of `source` as seen by a document of format `target`
pub fn transfer_extras(source: &FormatExtras, target: FormatKind) -> FormatExtras {
    match (source, target) {
        (FormatExtras::Ttaf1(extras), FormatKind::Ttaf1) => FormatExtras::Ttaf1(extras.clone()),
        (_, target) => FormatExtras::default_for(target),
    }
}

/// Build the document a `target` provider will serialize
pub fn convert_document(source: &SubtitleDocument, target: FormatKind) -> SubtitleDocument {
    SubtitleDocument {
        cues: source.cues.clone(),
        language: source.language.clone(),
        framerate: source.framerate,
        extras: transfer_extras(&source.extras, target),
    }
}
