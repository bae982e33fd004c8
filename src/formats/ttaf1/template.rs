/*!
 * Typed TTAF1 export template.
 *
 * A template file is parsed once into a `Ttaf1Template`: the root element
 * shell plus its ordered top-level parts, with `head`, `head/metadata` and
 * `body` singled out. Rendering builds a fresh tree from that description
 * and the document; the template value itself is never modified.
 */

use crate::errors::SubtitleResult;
use crate::subtitle_document::{SubtitleDocument, Ttaf1Extras};
use crate::timecode::seconds_to_frames;
use crate::xml_tree::{XmlElement, XmlNode, parse_document, write_document};

use super::is_ttaf1_tree;

/// Namespace of TTAF1 timing parameters (`ttp:`)
pub const PARAMETER_NAMESPACE: &str = "http://www.w3.org/2006/10/ttaf1#parameter";

/// Namespace of TTAF1 metadata (`ttm:`)
pub const METADATA_NAMESPACE: &str = "http://www.w3.org/2006/10/ttaf1#metadata";

/// `head/metadata` of a template
#[derive(Debug, Clone, PartialEq)]
pub struct MetadataSection {
    /// The element without its children
    pub shell: XmlElement,
    /// Existing metadata entries, whitespace-only text removed
    pub entries: Vec<XmlNode>,
}

/// Child of a template `head`
#[derive(Debug, Clone, PartialEq)]
pub enum HeadPart {
    Metadata(MetadataSection),
    Other(XmlNode),
}

/// `head` of a template
#[derive(Debug, Clone, PartialEq)]
pub struct HeadSection {
    pub shell: XmlElement,
    pub children: Vec<HeadPart>,
}

impl HeadSection {
    fn empty() -> Self {
        HeadSection {
            shell: XmlElement::new("head"),
            children: Vec::new(),
        }
    }
}

/// Top-level child of the template root
#[derive(Debug, Clone, PartialEq)]
pub enum TemplatePart {
    Head(HeadSection),
    /// The body shell; its template content is always discarded
    Body(XmlElement),
    Other(XmlNode),
}

/// Parsed export template
#[derive(Debug, Clone, PartialEq)]
pub struct Ttaf1Template {
    /// The `tt` element without its children
    pub root: XmlElement,
    pub parts: Vec<TemplatePart>,
}

impl Ttaf1Template {
    /// Parse template text, returning `None` when it is not a TTAF1 document
    pub fn parse(text: &str) -> SubtitleResult<Option<Self>> {
        let root = match parse_document(text.trim()) {
            Ok(root) => root,
            Err(_) => return Ok(None),
        };
        if !is_ttaf1_tree(&root) {
            return Ok(None);
        }
        Ok(Some(Self::from_tree(root)))
    }

    fn from_tree(mut root: XmlElement) -> Self {
        let children = std::mem::take(&mut root.children);
        let mut parts = Vec::new();
        let mut seen_head = false;

        for child in significant(children) {
            match child {
                XmlNode::Element(element)
                    if element.local_name() == "body" && element.namespace == root.namespace =>
                {
                    parts.push(TemplatePart::Body(shell_of(element)));
                }
                XmlNode::Element(element) if element.local_name() == "head" && !seen_head => {
                    seen_head = true;
                    parts.push(TemplatePart::Head(head_section(element)));
                }
                other => parts.push(TemplatePart::Other(other)),
            }
        }

        Ttaf1Template { root, parts }
    }

    /// Frame rate declared by the template, if positive
    pub fn frame_rate(&self) -> Option<f64> {
        self.root
            .attribute_by_local_name("frameRate")
            .and_then(|value| value.trim().parse::<f64>().ok())
            .filter(|fps| fps.is_finite() && *fps > 0.0)
    }

    pub fn head(&self) -> Option<&HeadSection> {
        self.parts.iter().find_map(|part| match part {
            TemplatePart::Head(head) => Some(head),
            _ => None,
        })
    }

    /// Render the document into this template at the given frame rate
    pub fn render(&self, document: &SubtitleDocument, extras: &Ttaf1Extras, fps: f64) -> SubtitleResult<String> {
        let mut root = self.root.clone();
        root.set_attribute("xmlns:ttp", PARAMETER_NAMESPACE);
        root.remove_attributes_by_local_name("frameRate");
        root.set_attribute("ttp:frameRate", format_frame_rate(fps));
        if let Some(language) = document.language.as_deref().filter(|lang| !lang.is_empty()) {
            root.set_attribute("xml:lang", language);
        }

        let ttm_declared_on_root = root.declares_prefix("ttm");
        let mut parts = self.parts.clone();
        if self.head().is_none() {
            let body_position = parts
                .iter()
                .position(|part| matches!(part, TemplatePart::Body(_)))
                .unwrap_or(parts.len());
            parts.insert(body_position, TemplatePart::Head(HeadSection::empty()));
        }

        for part in parts {
            let node = match part {
                TemplatePart::Head(head) => render_head(head, extras, ttm_declared_on_root),
                TemplatePart::Body(shell) => render_body(shell, document, fps),
                TemplatePart::Other(node) => node,
            };
            root.children.push(node);
        }

        write_document(&root)
    }
}

fn render_head(head: HeadSection, extras: &Ttaf1Extras, ttm_declared: bool) -> XmlNode {
    let ttm_declared = ttm_declared || head.shell.declares_prefix("ttm");
    let mut element = head.shell;
    let mut has_metadata = false;

    for part in head.children {
        match part {
            HeadPart::Metadata(metadata) => {
                has_metadata = true;
                element.children.push(render_metadata(metadata, extras, ttm_declared));
            }
            HeadPart::Other(node) => element.children.push(node),
        }
    }

    if !has_metadata {
        let metadata = MetadataSection {
            shell: XmlElement::new("metadata"),
            entries: Vec::new(),
        };
        element.children.push(render_metadata(metadata, extras, ttm_declared));
    }

    XmlNode::Element(element)
}

fn render_metadata(metadata: MetadataSection, extras: &Ttaf1Extras, ttm_declared: bool) -> XmlNode {
    let mut element = metadata.shell;
    if !ttm_declared && !element.declares_prefix("ttm") {
        element.set_attribute("xmlns:ttm", METADATA_NAMESPACE);
    }
    element.children = metadata.entries;

    if let Some(title) = extras.title.as_deref().filter(|value| !value.is_empty()) {
        replace_entry(&mut element, "title", title);
    }
    if let Some(copyright) = extras.copyright.as_deref().filter(|value| !value.is_empty()) {
        replace_entry(&mut element, "copyright", copyright);
    }

    XmlNode::Element(element)
}

// Replace the first entry with this local name, or append a new one
fn replace_entry(metadata: &mut XmlElement, local: &str, value: &str) {
    let entry = XmlNode::Element(XmlElement::new(format!("ttm:{}", local)).with_text(value));
    let existing = metadata.children.iter().position(|node| {
        matches!(node, XmlNode::Element(element) if element.local_name() == local)
    });

    match existing {
        Some(index) => metadata.children[index] = entry,
        None => metadata.children.push(entry),
    }
}

fn render_body(shell: XmlElement, document: &SubtitleDocument, fps: f64) -> XmlNode {
    let mut container = XmlElement::new("div");

    for (index, cue) in document.cues.iter().enumerate() {
        let mut paragraph = XmlElement::new("p")
            .with_attribute("xml:id", format!("subtitle{}", index + 1))
            .with_attribute("begin", format!("{}f", seconds_to_frames(cue.from, fps)))
            .with_attribute("end", format!("{}f", seconds_to_frames(cue.to, fps)));
        if !cue.text.is_empty() {
            paragraph = paragraph.with_text(cue.text.as_str());
        }
        container.children.push(XmlNode::Element(paragraph));
    }

    let mut body = shell;
    body.children = vec![XmlNode::Element(container)];
    XmlNode::Element(body)
}

fn head_section(mut head: XmlElement) -> HeadSection {
    let children = std::mem::take(&mut head.children);
    let mut parts = Vec::new();
    let mut seen_metadata = false;

    for child in significant(children) {
        match child {
            XmlNode::Element(mut element) if element.local_name() == "metadata" && !seen_metadata => {
                seen_metadata = true;
                let entries = significant(std::mem::take(&mut element.children));
                parts.push(HeadPart::Metadata(MetadataSection {
                    shell: element,
                    entries,
                }));
            }
            other => parts.push(HeadPart::Other(other)),
        }
    }

    HeadSection {
        shell: head,
        children: parts,
    }
}

fn shell_of(mut element: XmlElement) -> XmlElement {
    element.children.clear();
    element
}

// Drop whitespace-only text so the writer can re-indent
fn significant(nodes: Vec<XmlNode>) -> Vec<XmlNode> {
    nodes
        .into_iter()
        .filter(|node| !matches!(node, XmlNode::Text(text) if text.trim().is_empty()))
        .collect()
}

fn format_frame_rate(fps: f64) -> String {
    if fps.fract() == 0.0 {
        format!("{}", fps as u64)
    } else {
        format!("{}", fps)
    }
}
