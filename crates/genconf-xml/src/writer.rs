// crates/genconf-xml/src/writer.rs

//! Serializes a [`Document`] tree back into XML text.
//!
//! Output is re-indented with two spaces and ends with a newline, so the
//! rewritten configuration files stay diff-friendly and re-parseable.

use crate::error::XmlError;
use crate::model::{Document, Element, Node};
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesPI, BytesStart, BytesText, Event};
use std::fs;
use std::path::Path;

/// Serializes `document` into an XML string.
pub fn save_document_to_string(document: &Document) -> Result<String, XmlError> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);

    if let Some(decl) = document.decl() {
        writer.write_event(Event::Decl(BytesDecl::new(
            &decl.version,
            decl.encoding.as_deref(),
            decl.standalone.as_deref(),
        )))?;
    }
    for node in document.prolog() {
        write_node(&mut writer, node)?;
    }
    write_element(&mut writer, document.root())?;
    for node in document.trailing() {
        write_node(&mut writer, node)?;
    }

    let mut xml =
        String::from_utf8(writer.into_inner()).map_err(|e| XmlError::Utf8(e.utf8_error()))?;
    xml.push('\n');
    Ok(xml)
}

/// Serializes `document` and writes it to `path`.
pub fn save_document_to_file(document: &Document, path: &Path) -> Result<(), XmlError> {
    let xml = save_document_to_string(document)?;
    fs::write(path, xml)?;
    Ok(())
}

fn write_element(writer: &mut Writer<Vec<u8>>, element: &Element) -> Result<(), XmlError> {
    let mut start = BytesStart::new(element.name());
    for (key, value) in element.attributes() {
        // The (&str, &str) conversion escapes the attribute value.
        start.push_attribute((key, value));
    }

    if element.children().is_empty() {
        writer.write_event(Event::Empty(start))?;
    } else {
        writer.write_event(Event::Start(start))?;
        for child in element.children() {
            write_node(writer, child)?;
        }
        writer.write_event(Event::End(BytesEnd::new(element.name())))?;
    }
    Ok(())
}

fn write_node(writer: &mut Writer<Vec<u8>>, node: &Node) -> Result<(), XmlError> {
    match node {
        Node::Element(element) => write_element(writer, element)?,
        Node::Text(text) => writer.write_event(Event::Text(BytesText::new(text)))?,
        Node::Comment(text) => {
            writer.write_event(Event::Comment(BytesText::from_escaped(text.as_str())))?
        }
        Node::ProcessingInstruction(content) => {
            writer.write_event(Event::PI(BytesPI::new(content.as_str())))?
        }
        Node::DocType(content) => {
            writer.write_event(Event::DocType(BytesText::from_escaped(content.as_str())))?
        }
    }
    Ok(())
}
