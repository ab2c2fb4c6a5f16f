// crates/genconf-xml/src/model.rs

//! The document tree: elements with ordered attributes, plus the handful of
//! node kinds a configuration file can contain.

use crate::error::XmlError;
use std::fmt;

/// A node within a [`Document`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
    Comment(String),
    /// Content of a `<?...?>` instruction, without the delimiters.
    ProcessingInstruction(String),
    /// Content of a `<!DOCTYPE ...>` declaration, without the delimiters.
    DocType(String),
}

/// A named element with ordered attributes and child nodes.
///
/// Attribute order is insertion order. [`Element::set_attribute`] overwrites
/// an existing key in place, so an overridden attribute keeps its original
/// position; output stays stable under overrides.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<Node>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Element {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the value of the attribute `key`, if set.
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Sets `key` to `value`, overwriting in place if the key already exists.
    pub fn set_attribute(&mut self, key: &str, value: &str) {
        match self.attributes.iter_mut().find(|(k, _)| k == key) {
            Some((_, v)) => *v = value.to_string(),
            None => self.attributes.push((key.to_string(), value.to_string())),
        }
    }

    /// Attributes in document order.
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn append_child(&mut self, node: Node) {
        self.children.push(node);
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    pub(crate) fn children_mut(&mut self) -> &mut Vec<Node> {
        &mut self.children
    }

    /// Direct child elements, skipping text and comments.
    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(element) => Some(element),
            _ => None,
        })
    }
}

/// The `<?xml ...?>` declaration of a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlDecl {
    pub version: String,
    pub encoding: Option<String>,
    pub standalone: Option<String>,
}

impl Default for XmlDecl {
    fn default() -> Self {
        XmlDecl {
            version: "1.0".to_string(),
            encoding: Some("UTF-8".to_string()),
            standalone: None,
        }
    }
}

/// A whole XML document: declaration, prolog nodes, the root element, and
/// any nodes after the root (document-level comments land there).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub(crate) decl: Option<XmlDecl>,
    pub(crate) prolog: Vec<Node>,
    pub(crate) root: Element,
    pub(crate) trailing: Vec<Node>,
}

impl Document {
    /// Creates a document around `root` with a standard UTF-8 declaration.
    pub fn new(root: Element) -> Self {
        Document {
            decl: Some(XmlDecl::default()),
            prolog: Vec::new(),
            root,
            trailing: Vec::new(),
        }
    }

    pub fn root(&self) -> &Element {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut Element {
        &mut self.root
    }

    pub fn decl(&self) -> Option<&XmlDecl> {
        self.decl.as_ref()
    }

    /// Nodes before the root element.
    pub fn prolog(&self) -> &[Node] {
        &self.prolog
    }

    /// Nodes after the root element.
    pub fn trailing(&self) -> &[Node] {
        &self.trailing
    }

    /// Appends a document-level comment after the root element.
    pub fn append_trailing_comment(&mut self, text: &str) {
        self.trailing.push(Node::Comment(text.to_string()));
    }

    /// Finds the single element matching `selector` anywhere in the document
    /// (the root included) and returns its path.
    ///
    /// Zero matches and multiple matches are distinct errors; a caller that
    /// needs an insertion anchor must not guess between candidates.
    pub fn find_unique(&self, selector: &ElementSelector) -> Result<NodePath, XmlError> {
        let mut matches = Vec::new();
        let mut path = Vec::new();
        collect_matches(&self.root, selector, &mut path, &mut matches);
        match matches.len() {
            1 => Ok(NodePath(matches.swap_remove(0))),
            0 => Err(XmlError::NoMatch {
                selector: selector.to_string(),
            }),
            count => Err(XmlError::AmbiguousMatch {
                selector: selector.to_string(),
                count,
            }),
        }
    }

    /// Inserts `node` as the immediate next sibling of the element at `anchor`.
    pub fn insert_after(&mut self, anchor: &NodePath, node: Node) -> Result<(), XmlError> {
        let (last, ancestors) = anchor.0.split_last().ok_or(XmlError::RootAnchor)?;
        let mut parent = &mut self.root;
        for &index in ancestors {
            match parent.children.get_mut(index) {
                Some(Node::Element(element)) => parent = element,
                _ => return Err(XmlError::InvalidPath),
            }
        }
        if *last >= parent.children.len() {
            return Err(XmlError::InvalidPath);
        }
        parent.children.insert(last + 1, node);
        Ok(())
    }
}

fn collect_matches(
    element: &Element,
    selector: &ElementSelector,
    path: &mut Vec<usize>,
    matches: &mut Vec<Vec<usize>>,
) {
    if selector.matches(element) {
        matches.push(path.clone());
    }
    for (index, child) in element.children.iter().enumerate() {
        if let Node::Element(child_element) = child {
            path.push(index);
            collect_matches(child_element, selector, path, matches);
            path.pop();
        }
    }
}

/// Path of child indices from the root to a node, as returned by
/// [`Document::find_unique`]. Valid until the document is mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodePath(Vec<usize>);

/// Matches elements by name and, optionally, one attribute value.
///
/// Displayed in XPath style (`//Valve[@className='...']`) so lookup errors
/// read like the query that failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementSelector {
    name: String,
    attribute: Option<(String, String)>,
}

impl ElementSelector {
    pub fn named(name: &str) -> Self {
        ElementSelector {
            name: name.to_string(),
            attribute: None,
        }
    }

    pub fn with_attribute(mut self, key: &str, value: &str) -> Self {
        self.attribute = Some((key.to_string(), value.to_string()));
        self
    }

    fn matches(&self, element: &Element) -> bool {
        if element.name != self.name {
            return false;
        }
        match &self.attribute {
            Some((key, value)) => element.attribute(key) == Some(value.as_str()),
            None => true,
        }
    }
}

impl fmt::Display for ElementSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.attribute {
            Some((key, value)) => write!(f, "//{}[@{}='{}']", self.name, key, value),
            None => write!(f, "//{}", self.name),
        }
    }
}
