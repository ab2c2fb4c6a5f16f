// crates/genconf-xml/src/lib.rs

//! Loads, mutates, and saves XML documents as a small in-memory tree.
//!
//! Tomcat configuration files (`context.xml`, `server.xml`) are rewritten in
//! place: the existing document is parsed, new elements are appended or
//! spliced next to an anchor element, and the result is serialized back.
//!
//! It supports:
//! - `load_document_from_str` / `load_document_from_file`: parsing into a
//!   [`Document`] tree with ordered attributes.
//! - `Document::find_unique` / `Document::insert_after`: locating exactly one
//!   element matching an [`ElementSelector`] and inserting a new node as its
//!   immediate next sibling.
//! - `save_document_to_string` / `save_document_to_file`: re-indented,
//!   re-parseable serialization.

// --- Crate Modules ---

mod error;
mod model;
mod parser;
mod writer;

// --- Public API Re-exports ---

pub use error::XmlError;
pub use model::{Document, Element, ElementSelector, Node, NodePath, XmlDecl};
pub use parser::{load_document_from_file, load_document_from_str};
pub use writer::{save_document_to_file, save_document_to_string};
