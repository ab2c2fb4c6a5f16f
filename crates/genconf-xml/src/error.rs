// crates/genconf-xml/src/error.rs

use quick_xml::escape::EscapeError;
use quick_xml::events::attributes::AttrError;
use thiserror::Error;

/// Errors that can occur while loading, querying, or saving a document.
#[derive(Debug, Error)]
pub enum XmlError {
    /// An error from the underlying `quick-xml` reader or writer.
    #[error("XML parsing error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// An attribute could not be parsed (duplicate key, bad syntax).
    #[error("malformed XML attribute: {0}")]
    Attribute(#[from] AttrError),

    /// An escaped sequence in text or attribute content was invalid.
    #[error("XML escaping error: {0}")]
    Escape(#[from] EscapeError),

    /// The document contained bytes that are not valid UTF-8.
    #[error("document is not valid UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    /// An I/O error while reading or writing a document file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An entity reference that is neither predefined nor a character reference.
    #[error("unresolvable entity reference '&{0};'")]
    UnknownEntity(String),

    /// The document ended without a root element.
    #[error("document has no root element")]
    MissingRoot,

    /// A closing tag appeared with no matching open element.
    #[error("unexpected closing tag </{0}>")]
    UnexpectedClosingTag(String),

    /// `find_unique` found no element for the selector.
    #[error("no element matches {selector}")]
    NoMatch { selector: String },

    /// `find_unique` found more than one element for the selector.
    #[error("{count} elements match {selector}, expected exactly one")]
    AmbiguousMatch { selector: String, count: usize },

    /// The anchor is the root element, which cannot take a sibling.
    #[error("cannot insert a sibling of the root element")]
    RootAnchor,

    /// A node path no longer points into the document.
    #[error("node path does not point into the document")]
    InvalidPath,
}
