/*!
 * TTAF1 (TTML) provider.
 *
 * Import reads frame-based `begin`/`end` attributes (`<frames>f`) from every
 * `p` under `body`. Export renders the cues into a template document: a
 * template from the configured directory, a built-in template compiled into
 * the binary, or a template file.
 */

pub mod template;

use std::path::{Path, PathBuf};

use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::encoding::{SourceEncoding, detection_text, encode_output, normalized_text};
use crate::errors::{SubtitleError, SubtitleResult};
use crate::formats::{ExportOptions, ParseOptions, SubtitleFormat, display_name, invalid_format};
use crate::registry::FormatKind;
use crate::rich_text::{LINE_BREAK, plain_to_rich, rich_to_plain};
use crate::subtitle_document::{FormatExtras, SubtitleCue, SubtitleDocument, Ttaf1Extras};
use crate::timecode::{FramerateUse, framerate_or_default, frames_to_seconds};
use crate::xml_tree::{XmlElement, parse_document};

pub use template::Ttaf1Template;

/// Named built-in templates compiled into the binary, keyed by lowercase name
const BUILTIN_TEMPLATES: &[(&str, &str)] = &[
    ("default", include_str!("../../../resources/ttaf1_templates/default.xml")),
    ("broadcast", include_str!("../../../resources/ttaf1_templates/broadcast.xml")),
];

static FRAME_TIME: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^([0-9]+)f").unwrap());

/// TTAF1 provider
#[derive(Debug, Clone, Copy, Default)]
pub struct Ttaf1Format;

/// Structural TTAF1 check on a parsed tree.
///
/// The root is `tt`, no other `tt` element exists and exactly one `body`
/// in the root's namespace sits directly under it.
pub(crate) fn is_ttaf1_tree(root: &XmlElement) -> bool {
    if root.local_name() != "tt" {
        return false;
    }
    if root.descendants().iter().any(|element| element.local_name() == "tt") {
        return false;
    }
    root.child_elements()
        .filter(|child| child.local_name() == "body" && child.namespace == root.namespace)
        .count()
        == 1
}

fn parse_tree(contents: &[u8]) -> Option<XmlElement> {
    parse_document(detection_text(contents).trim()).ok()
}

fn body_of(root: &XmlElement) -> Option<&XmlElement> {
    root.child_elements()
        .find(|child| child.local_name() == "body" && child.namespace == root.namespace)
}

// title/copyright live in the single head/metadata block, if any
fn read_metadata(root: &XmlElement, extras: &mut Ttaf1Extras) {
    let metadata: Vec<&XmlElement> = root
        .child_elements()
        .filter(|child| child.local_name() == "head")
        .flat_map(|head| head.child_elements())
        .filter(|child| child.local_name() == "metadata")
        .collect();
    let [metadata] = metadata.as_slice() else {
        return;
    };

    let single_text = |local: &str| {
        let found: Vec<&XmlElement> = metadata
            .descendants()
            .into_iter()
            .filter(|element| element.local_name() == local)
            .collect();
        match found.as_slice() {
            [element] => Some(element.text_content().trim().to_string()).filter(|text| !text.is_empty()),
            _ => None,
        }
    };

    extras.title = single_text("title");
    extras.copyright = single_text("copyright");
}

// Reducing the child XML decodes it once: escaped markup written by export
// comes back as rich text, while `<br/>` elements arrive as newlines.
fn paragraph_text(inner_xml: &str) -> String {
    let reduced = rich_to_plain(inner_xml).replace('\n', LINE_BREAK);
    plain_to_rich(&rich_to_plain(&reduced))
}

fn frame_attribute(paragraph: &XmlElement, attribute: &'static str, fps: f64) -> SubtitleResult<f64> {
    paragraph
        .attribute(attribute)
        .and_then(|value| FRAME_TIME.captures(value.trim_start()))
        .and_then(|caps| caps[1].parse::<u64>().ok())
        .map(|frames| frames_to_seconds(frames, fps))
        .ok_or_else(|| SubtitleError::MalformedCueTiming {
            cue_id: paragraph.attribute("xml:id").unwrap_or_default().to_string(),
            attribute,
        })
}

impl Ttaf1Format {
    /// Resolve the export template.
    ///
    /// A reference is tried as `<name>.xml` in the template directory, then
    /// as a built-in template name, then as a literal path. No reference
    /// means the built-in default template.
    pub fn load_template(
        &self,
        reference: Option<&str>,
        template_dir: Option<&Path>,
    ) -> SubtitleResult<Ttaf1Template> {
        let Some(reference) = reference.filter(|value| !value.trim().is_empty()) else {
            return builtin_template("default");
        };

        let path = match template_dir.and_then(|dir| find_template_in_dir(reference, dir)) {
            Some(path) => path,
            None if builtin_source(reference).is_some() => return builtin_template(reference),
            None => PathBuf::from(reference),
        };

        let name = display_name(&path.to_string_lossy());
        if !path.is_file() {
            return Err(SubtitleError::TemplateNotFound(name));
        }

        debug!("Loading TTAF1 template {}", path.display());
        let bytes = std::fs::read(&path)?;
        let text = normalized_text(&bytes, SourceEncoding::DEFAULT_CANDIDATES, &name)?;
        Ttaf1Template::parse(&text)?.ok_or(SubtitleError::InvalidTemplate(name))
    }
}

fn builtin_source(name: &str) -> Option<&'static str> {
    let name = name.trim().to_lowercase();
    BUILTIN_TEMPLATES
        .iter()
        .find(|(builtin, _)| *builtin == name)
        .map(|(_, xml)| *xml)
}

fn builtin_template(name: &str) -> SubtitleResult<Ttaf1Template> {
    let file_name = format!("{}.xml", name.trim().to_lowercase());
    let source = builtin_source(name).ok_or_else(|| SubtitleError::TemplateNotFound(file_name.clone()))?;
    debug!("Using built-in TTAF1 template {}", file_name);
    Ttaf1Template::parse(source)?.ok_or(SubtitleError::InvalidTemplate(file_name))
}

/// `<name>.xml` (lowercased) inside the template directory, if that file exists
pub fn find_template_in_dir(reference: &str, template_dir: &Path) -> Option<PathBuf> {
    let candidate = template_dir.join(format!("{}.xml", reference.to_lowercase()));
    candidate.is_file().then_some(candidate)
}

impl SubtitleFormat for Ttaf1Format {
    fn kind(&self) -> FormatKind {
        FormatKind::Ttaf1
    }

    fn detect(&self, contents: &[u8]) -> bool {
        parse_tree(contents).is_some_and(|root| is_ttaf1_tree(&root))
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
        let root = parse_document(text.trim())?;
        let body = body_of(&root).ok_or_else(|| invalid_format(self.kind(), source_name))?;

        let mut document = SubtitleDocument::new(self.kind());
        document.framerate = root
            .attribute_by_local_name("frameRate")
            .and_then(|value| value.trim().parse::<f64>().ok())
            .filter(|fps| fps.is_finite() && *fps > 0.0);
        document.language = root
            .attribute("xml:lang")
            .map(str::trim)
            .filter(|lang| !lang.is_empty())
            .map(str::to_string);

        let mut extras = Ttaf1Extras::default();
        read_metadata(&root, &mut extras);
        document.extras = FormatExtras::Ttaf1(extras);

        let fps = framerate_or_default(document.framerate, FramerateUse::Import);
        for paragraph in body.descendants().into_iter().filter(|element| element.local_name() == "p") {
            let from = frame_attribute(paragraph, "begin", fps)?;
            let to = frame_attribute(paragraph, "end", fps)?;
            let text = paragraph_text(&paragraph.inner_xml()?);
            document.cues.push(SubtitleCue::new(from, to, text));
        }

        Ok(document)
    }

    fn serialize(&self, document: &SubtitleDocument, options: &ExportOptions) -> SubtitleResult<Vec<u8>> {
        let extras = document.extras.ttaf1().cloned().unwrap_or_default();
        let template = self.load_template(extras.template.as_deref(), options.template_dir.as_deref())?;

        let fps = match template.frame_rate() {
            Some(fps) => fps,
            None => framerate_or_default(document.framerate, FramerateUse::Export),
        };

        let xml = template.render(document, &extras, fps)?;
        Ok(encode_output(&xml, options.include_bom))
    }
}
