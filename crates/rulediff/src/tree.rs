//! In-memory XML document model.
//!
//! Rulesets are small, so the whole document is held as an owned tree. Element and attribute
//! names keep their original prefix for writing, while comparison always works on the local name
//! and the resolved namespace URI.

use super::*;

/// Namespace URI bound to the reserved `xml` prefix.
pub const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";

/// An element or attribute name, split into an optional prefix and the local part.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct QualifiedName {
  /// Namespace prefix as written in the document
  pub prefix: Option<String>,
  /// Local part of the name
  pub local:  String,
}

impl QualifiedName {
  /// Creates an unprefixed name.
  pub fn new(local: impl Into<String>) -> Self { Self { prefix: None, local: local.into() } }

  /// Splits a raw `prefix:local` name.
  pub fn parse(raw: &str) -> Self {
    match raw.split_once(':') {
      Some((prefix, local)) =>
        Self { prefix: Some(prefix.to_string()), local: local.to_string() },
      None => Self::new(raw),
    }
  }
}

impl Display for QualifiedName {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match &self.prefix {
      Some(prefix) => write!(f, "{prefix}:{}", self.local),
      None => write!(f, "{}", self.local),
    }
  }
}

/// A single attribute of an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
  /// Attribute name as written
  pub name:      QualifiedName,
  /// Resolved namespace URI; unprefixed attributes have none
  pub namespace: Option<String>,
  /// Unescaped attribute value
  pub value:     String,
}

impl Attribute {
  /// Creates an unprefixed attribute without namespace.
  pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
    Self { name: QualifiedName::new(name), namespace: None, value: value.into() }
  }

  /// Whether this attribute is an `xmlns` or `xmlns:prefix` declaration.
  pub fn is_namespace_declaration(&self) -> bool {
    match &self.name.prefix {
      Some(prefix) => prefix == "xmlns",
      None => self.name.local == "xmlns",
    }
  }
}

/// A node in the element tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
  /// A nested element
  Element(Element),
  /// Character data, already unescaped
  Text(String),
  /// A CDATA section
  CData(String),
  /// A comment; annotations produced by the comparison end up here
  Comment(String),
}

impl Node {
  /// Returns the element if this node is one.
  pub fn as_element(&self) -> Option<&Element> {
    match self {
      Node::Element(element) => Some(element),
      _ => None,
    }
  }

  /// Mutable variant of [`Node::as_element`].
  pub fn as_element_mut(&mut self) -> Option<&mut Element> {
    match self {
      Node::Element(element) => Some(element),
      _ => None,
    }
  }
}

/// An XML element with its attributes and children.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Element {
  /// Element name as written
  pub name:       QualifiedName,
  /// Resolved namespace URI of the element
  pub namespace:  Option<String>,
  /// Attributes in document order, including namespace declarations
  pub attributes: Vec<Attribute>,
  /// Child nodes in document order
  pub children:   Vec<Node>,
}

impl Element {
  /// Creates an empty, unprefixed element.
  pub fn new(local: impl Into<String>) -> Self {
    Self { name: QualifiedName::new(local), ..Default::default() }
  }

  /// Adds an attribute.
  pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
    self.attributes.push(Attribute::new(name, value));
    self
  }

  /// Appends a child element.
  pub fn with_child(mut self, child: Element) -> Self {
    self.children.push(Node::Element(child));
    self
  }

  /// Appends a text node.
  pub fn with_text(mut self, text: impl Into<String>) -> Self {
    self.children.push(Node::Text(text.into()));
    self
  }

  /// Iterates over the direct child elements.
  pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
    self.children.iter().filter_map(Node::as_element)
  }

  /// Finds the first direct child element with the given local name.
  pub fn find_child(&self, local: &str) -> Option<&Element> {
    self.child_elements().find(|child| child.name.local == local)
  }

  /// Looks up a non-declaration attribute value by local name.
  pub fn attribute(&self, local: &str) -> Option<&str> {
    self
      .attributes
      .iter()
      .filter(|attr| !attr.is_namespace_declaration())
      .find(|attr| attr.name.local == local)
      .map(|attr| attr.value.as_str())
  }

  /// Concatenated text and CDATA of the direct children, trimmed.
  pub fn text(&self) -> String {
    let mut text = String::new();
    for child in &self.children {
      match child {
        Node::Text(t) | Node::CData(t) => text.push_str(t),
        _ => (),
      }
    }
    text.trim().to_string()
  }

  /// Whether both elements have the same local name and namespace URI.
  ///
  /// Prefixes are irrelevant: `<ugh:Name>` and `<u:Name>` bound to the same URI are the same.
  pub fn same_name(&self, other: &Element) -> bool {
    self.name.local == other.name.local && self.namespace == other.namespace
  }

  /// Iterates over the text of the direct comment children.
  pub fn comments(&self) -> impl Iterator<Item = &str> {
    self.children.iter().filter_map(|child| match child {
      Node::Comment(comment) => Some(comment.as_str()),
      _ => None,
    })
  }
}

/// A parsed XML document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
  /// The single root element
  pub root: Element,
}

impl Document {
  /// Wraps a root element.
  pub fn new(root: Element) -> Self { Self { root } }
}
