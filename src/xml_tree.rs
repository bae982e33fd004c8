/*!
 * Small owned XML tree on top of quick-xml.
 *
 * TTAF1 needs random access to a whole document (detection counts elements,
 * import walks `body` descendants, templates are read as a tree), so events
 * are folded into `XmlElement` values. Element namespaces are resolved while
 * reading; attributes keep their qualified names.
 */

use std::io::Write;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::name::{Namespace, ResolveResult};
use quick_xml::reader::NsReader;
use quick_xml::Writer;

use crate::errors::{SubtitleError, SubtitleResult};
use crate::rich_text::decode_entities;

/// A node inside an element
#[derive(Debug, Clone, PartialEq)]
pub enum XmlNode {
    Element(XmlElement),
    /// Unescaped character data
    Text(String),
    Comment(String),
}

/// An element with its resolved namespace
#[derive(Debug, Clone, PartialEq, Default)]
pub struct XmlElement {
    /// Qualified name as written, e.g. `ttm:title`
    pub name: String,
    /// Namespace URI the element name resolved to
    pub namespace: Option<String>,
    /// Attributes in document order, qualified names, unescaped values
    pub attributes: Vec<(String, String)>,
    pub children: Vec<XmlNode>,
}

/// Local part of a qualified name
pub fn local_part(name: &str) -> &str {
    name.rsplit_once(':').map_or(name, |(_, local)| local)
}

fn xml_error(error: impl std::fmt::Display) -> SubtitleError {
    SubtitleError::Xml(error.to_string())
}

impl XmlElement {
    pub fn new(name: impl Into<String>) -> Self {
        XmlElement {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attribute(name, value);
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.children.push(XmlNode::Text(text.into()));
        self
    }

    pub fn local_name(&self) -> &str {
        local_part(&self.name)
    }

    /// Attribute by qualified name
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// First non-namespace-declaration attribute whose local name matches
    pub fn attribute_by_local_name(&self, local: &str) -> Option<&str> {
        self.attributes
            .iter()
            .filter(|(key, _)| !is_namespace_declaration(key))
            .find(|(key, _)| local_part(key) == local)
            .map(|(_, value)| value.as_str())
    }

    /// Replace the attribute value, or append it when absent
    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(key, _)| *key == name) {
            Some(slot) => slot.1 = value,
            None => self.attributes.push((name, value)),
        }
    }

    /// Drop every attribute whose local name matches (namespace declarations excluded)
    pub fn remove_attributes_by_local_name(&mut self, local: &str) {
        self.attributes
            .retain(|(key, _)| is_namespace_declaration(key) || local_part(key) != local);
    }

    /// Whether `xmlns:<prefix>` is declared on this element
    pub fn declares_prefix(&self, prefix: &str) -> bool {
        self.attribute(&format!("xmlns:{}", prefix)).is_some()
    }

    pub fn child_elements(&self) -> impl Iterator<Item = &XmlElement> {
        self.children.iter().filter_map(|node| match node {
            XmlNode::Element(element) => Some(element),
            _ => None,
        })
    }

    /// All descendant elements in document order, excluding `self`
    pub fn descendants(&self) -> Vec<&XmlElement> {
        let mut found = Vec::new();
        collect_descendants(self, &mut found);
        found
    }

    /// Concatenated text of all descendant text nodes
    pub fn text_content(&self) -> String {
        let mut text = String::new();
        for node in &self.children {
            match node {
                XmlNode::Text(value) => text.push_str(value),
                XmlNode::Element(element) => text.push_str(&element.text_content()),
                XmlNode::Comment(_) => {}
            }
        }
        text
    }

    /// Serialized XML of the child nodes, without indentation
    pub fn inner_xml(&self) -> SubtitleResult<String> {
        let mut writer = Writer::new(Vec::new());
        for node in &self.children {
            write_node(&mut writer, node)?;
        }
        String::from_utf8(writer.into_inner()).map_err(xml_error)
    }
}

fn collect_descendants<'a>(element: &'a XmlElement, found: &mut Vec<&'a XmlElement>) {
    for child in element.child_elements() {
        found.push(child);
        collect_descendants(child, found);
    }
}

fn is_namespace_declaration(key: &str) -> bool {
    key == "xmlns" || key.starts_with("xmlns:")
}

/// Parse a complete document and return its root element.
///
/// The prolog, processing instructions and anything outside the root are
/// discarded.
pub fn parse_document(text: &str) -> SubtitleResult<XmlElement> {
    let mut reader = NsReader::from_str(text);
    reader.config_mut().trim_text(false);
    let decoder = reader.decoder();

    let mut stack: Vec<XmlElement> = Vec::new();
    let mut root: Option<XmlElement> = None;

    loop {
        let (resolved, event) = reader.read_resolved_event().map_err(xml_error)?;
        let namespace = match resolved {
            ResolveResult::Bound(Namespace(uri)) => Some(String::from_utf8_lossy(uri).into_owned()),
            _ => None,
        };

        match event {
            Event::Start(start) => {
                stack.push(element_from_start(&start, namespace, decoder)?);
            }
            Event::Empty(start) => {
                let element = element_from_start(&start, namespace, decoder)?;
                attach(&mut stack, &mut root, XmlNode::Element(element))?;
            }
            Event::End(_) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| xml_error("unexpected closing tag"))?;
                attach(&mut stack, &mut root, XmlNode::Element(element))?;
            }
            Event::Text(content) => {
                if let Some(parent) = stack.last_mut() {
                    let raw = decoder.decode(&content).map_err(xml_error)?;
                    parent
                        .children
                        .push(XmlNode::Text(decode_entities(&raw).into_owned()));
                }
            }
            Event::CData(content) => {
                if let Some(parent) = stack.last_mut() {
                    let raw = decoder.decode(&content).map_err(xml_error)?;
                    parent.children.push(XmlNode::Text(raw.into_owned()));
                }
            }
            Event::Comment(content) => {
                if let Some(parent) = stack.last_mut() {
                    let raw = decoder.decode(&content).map_err(xml_error)?;
                    parent.children.push(XmlNode::Comment(raw.into_owned()));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !stack.is_empty() {
        return Err(xml_error("unexpected end of document"));
    }
    root.ok_or_else(|| xml_error("document has no root element"))
}

fn element_from_start(
    start: &BytesStart<'_>,
    namespace: Option<String>,
    decoder: quick_xml::encoding::Decoder,
) -> SubtitleResult<XmlElement> {
    let mut element = XmlElement {
        name: String::from_utf8_lossy(start.name().as_ref()).into_owned(),
        namespace,
        ..Default::default()
    };
    for attribute in start.attributes() {
        let attribute = attribute.map_err(xml_error)?;
        let key = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();
        let value = attribute
            .decode_and_unescape_value(decoder)
            .map_err(xml_error)?
            .into_owned();
        element.attributes.push((key, value));
    }
    Ok(element)
}

fn attach(
    stack: &mut [XmlElement],
    root: &mut Option<XmlElement>,
    node: XmlNode,
) -> SubtitleResult<()> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(node),
        None => match node {
            XmlNode::Element(element) if root.is_none() => *root = Some(element),
            XmlNode::Element(_) => return Err(xml_error("multiple root elements")),
            _ => {}
        },
    }
    Ok(())
}

/// Render a document with an XML declaration and two-space indentation.
pub fn write_document(root: &XmlElement) -> SubtitleResult<String> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))
        .map_err(xml_error)?;
    write_element(&mut writer, root)?;

    let mut bytes = writer.into_inner();
    bytes.push(b'\n');
    String::from_utf8(bytes).map_err(xml_error)
}

fn write_node<W: Write>(writer: &mut Writer<W>, node: &XmlNode) -> SubtitleResult<()> {
    match node {
        XmlNode::Element(element) => write_element(writer, element),
        XmlNode::Text(text) => writer
            .write_event(Event::Text(BytesText::new(text)))
            .map_err(xml_error),
        XmlNode::Comment(comment) => writer
            .write_event(Event::Comment(BytesText::from_escaped(comment.as_str())))
            .map_err(xml_error),
    }
}

fn write_element<W: Write>(writer: &mut Writer<W>, element: &XmlElement) -> SubtitleResult<()> {
    let start = BytesStart::new(element.name.as_str()).with_attributes(
        element
            .attributes
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str())),
    );

    if element.children.is_empty() {
        return writer.write_event(Event::Empty(start)).map_err(xml_error);
    }

    writer.write_event(Event::Start(start)).map_err(xml_error)?;
    for child in &element.children {
        write_node(writer, child)?;
    }
    writer
        .write_event(Event::End(BytesEnd::new(element.name.as_str())))
        .map_err(xml_error)
}
