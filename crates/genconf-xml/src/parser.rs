// crates/genconf-xml/src/parser.rs

//! Parses XML text into the mutable [`Document`] tree.
//!
//! Whitespace-only text is dropped (documents are re-indented on save),
//! CDATA is folded into plain text, and entity references are resolved to
//! their characters. Comments and processing instructions are preserved
//! wherever they appear.

use crate::error::XmlError;
use crate::model::{Document, Element, Node, XmlDecl};
use quick_xml::Reader;
use quick_xml::events::{BytesDecl, BytesStart, Event};
use std::fs;
use std::path::Path;
use std::str;

/// Parses a complete XML document from a string slice.
///
/// # Errors
/// Returns an `XmlError` if the document is malformed, contains an
/// unresolvable entity reference, or has no root element.
pub fn load_document_from_str(xml: &str) -> Result<Document, XmlError> {
    let mut reader = Reader::from_str(xml);

    let mut decl: Option<XmlDecl> = None;
    let mut prolog: Vec<Node> = Vec::new();
    let mut trailing: Vec<Node> = Vec::new();
    let mut root: Option<Element> = None;
    let mut stack: Vec<Element> = Vec::new();

    loop {
        match reader.read_event()? {
            Event::Decl(d) => decl = Some(parse_decl(&d)?),
            Event::Start(start) => stack.push(parse_element(&start)?),
            Event::Empty(start) => {
                let element = parse_element(&start)?;
                place(
                    Node::Element(element),
                    &mut stack,
                    &mut root,
                    &mut prolog,
                    &mut trailing,
                );
            }
            Event::End(end) => {
                let element = stack.pop().ok_or_else(|| {
                    XmlError::UnexpectedClosingTag(
                        String::from_utf8_lossy(end.name().as_ref()).into_owned(),
                    )
                })?;
                match stack.last_mut() {
                    Some(parent) => parent.append_child(Node::Element(element)),
                    None => root = Some(element),
                }
            }
            Event::Text(text) => {
                let content = str::from_utf8(&text)?;
                if !content.trim().is_empty() {
                    append_text(&mut stack, content);
                }
            }
            Event::CData(data) => {
                let content = str::from_utf8(&data)?;
                if !content.trim().is_empty() {
                    append_text(&mut stack, content);
                }
            }
            Event::GeneralRef(reference) => {
                let name = str::from_utf8(&reference)?;
                let resolved = resolve_reference(name)?;
                append_text(&mut stack, &resolved);
            }
            Event::Comment(comment) => {
                let node = Node::Comment(str::from_utf8(&comment)?.to_string());
                place(node, &mut stack, &mut root, &mut prolog, &mut trailing);
            }
            Event::PI(pi) => {
                let node = Node::ProcessingInstruction(str::from_utf8(&pi)?.to_string());
                place(node, &mut stack, &mut root, &mut prolog, &mut trailing);
            }
            Event::DocType(doctype) => {
                let node = Node::DocType(str::from_utf8(&doctype)?.to_string());
                place(node, &mut stack, &mut root, &mut prolog, &mut trailing);
            }
            Event::Eof => break,
        }
    }

    let root = root.ok_or(XmlError::MissingRoot)?;
    Ok(Document {
        decl,
        prolog,
        root,
        trailing,
    })
}

/// Reads and parses the XML document at `path`.
pub fn load_document_from_file(path: &Path) -> Result<Document, XmlError> {
    let xml = fs::read_to_string(path)?;
    load_document_from_str(&xml)
}

/// Converts a start tag into an [`Element`] with its attributes decoded.
fn parse_element(start: &BytesStart) -> Result<Element, XmlError> {
    let name = str::from_utf8(start.name().as_ref())?.to_string();
    let mut element = Element::new(name);
    for attribute in start.attributes() {
        let attribute = attribute?;
        let key = str::from_utf8(attribute.key.as_ref())?.to_string();
        let value = attribute.unescape_value()?;
        element.set_attribute(&key, &value);
    }
    Ok(element)
}

fn parse_decl(decl: &BytesDecl) -> Result<XmlDecl, XmlError> {
    let version = str::from_utf8(&decl.version()?)?.to_string();
    let encoding = match decl.encoding() {
        Some(encoding) => Some(str::from_utf8(&encoding?)?.to_string()),
        None => None,
    };
    let standalone = match decl.standalone() {
        Some(standalone) => Some(str::from_utf8(&standalone?)?.to_string()),
        None => None,
    };
    Ok(XmlDecl {
        version,
        encoding,
        standalone,
    })
}

/// Attaches a non-element node to the open element, or to the document
/// prolog/trailer when no element is open. A self-closing element at
/// document level becomes the root.
fn place(
    node: Node,
    stack: &mut Vec<Element>,
    root: &mut Option<Element>,
    prolog: &mut Vec<Node>,
    trailing: &mut Vec<Node>,
) {
    if let Some(parent) = stack.last_mut() {
        parent.append_child(node);
    } else if root.is_none() {
        if let Node::Element(element) = node {
            *root = Some(element);
        } else {
            prolog.push(node);
        }
    } else {
        trailing.push(node);
    }
}

/// Appends text to the open element, merging with a preceding text node so
/// resolved entity references do not fragment the content.
fn append_text(stack: &mut Vec<Element>, content: &str) {
    if let Some(parent) = stack.last_mut() {
        if let Some(Node::Text(existing)) = parent.children_mut().last_mut() {
            existing.push_str(content);
        } else {
            parent.append_child(Node::Text(content.to_string()));
        }
    }
    // Non-whitespace text outside the root is not valid XML; the reader
    // reports it before we get here.
}

/// Resolves the predefined entities and numeric character references.
fn resolve_reference(name: &str) -> Result<String, XmlError> {
    match name {
        "amp" => Ok("&".to_string()),
        "lt" => Ok("<".to_string()),
        "gt" => Ok(">".to_string()),
        "apos" => Ok("'".to_string()),
        "quot" => Ok("\"".to_string()),
        _ => {
            let code = if let Some(hex) = name.strip_prefix("#x").or_else(|| name.strip_prefix("#X"))
            {
                u32::from_str_radix(hex, 16).ok()
            } else if let Some(decimal) = name.strip_prefix('#') {
                decimal.parse().ok()
            } else {
                None
            };
            code.and_then(char::from_u32)
                .map(String::from)
                .ok_or_else(|| XmlError::UnknownEntity(name.to_string()))
        }
    }
}
