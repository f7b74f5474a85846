//! Parsing of ruleset files into the [`tree`](crate::tree) model.
//!
//! [`Document::parse`] turns XML text into a [`Document`] using a `quick-xml` event reader,
//! resolving namespace prefixes on the way. [`RulesetReader`] wraps a file path and parses it
//! lazily, the first time the document is requested.
//!
//! # Examples
//!
//! ```no_run
//! use rulediff::reader::RulesetReader;
//!
//! # fn main() -> Result<(), rulediff::error::RulediffError> {
//! let reader = RulesetReader::new("ruleset.xml");
//! assert!(!reader.is_loaded());
//!
//! let document = reader.document()?;
//! println!("root element: {}", document.root.name);
//! # Ok(())
//! # }
//! ```

use std::{cell::OnceCell, collections::HashMap};

use quick_xml::{
  events::{BytesStart, Event},
  Reader,
};

use super::*;

impl Document {
  /// Parses XML text into a document.
  ///
  /// Whitespace-only text is dropped, comments and CDATA sections are kept. The XML declaration,
  /// processing instructions and the doctype are not part of the tree.
  ///
  /// # Errors
  ///
  /// - [`RulediffError::Xml`] for malformed markup or mismatched end tags
  /// - [`RulediffError::UnboundPrefix`] for prefixes without a declaration in scope
  /// - [`RulediffError::UnexpectedEof`] when elements are left open
  /// - [`RulediffError::EmptyDocument`] when there is no root element
  pub fn parse(xml: &str) -> Result<Document> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut builder = TreeBuilder::default();
    loop {
      match reader.read_event()? {
        Event::Start(start) => {
          let element = builder.open(&start)?;
          builder.stack.push(element);
        },
        Event::Empty(start) => {
          let element = builder.open(&start)?;
          builder.scopes.pop();
          builder.attach(element);
        },
        Event::End(_) => {
          builder.scopes.pop();
          if let Some(element) = builder.stack.pop() {
            builder.attach(element);
          }
        },
        Event::Text(text) => {
          let text = text.unescape()?;
          if !text.trim().is_empty() {
            builder.push_node(Node::Text(text.into_owned()));
          }
        },
        Event::CData(data) => {
          builder.push_node(Node::CData(std::str::from_utf8(&data)?.to_string()));
        },
        Event::Comment(comment) => {
          builder.push_node(Node::Comment(std::str::from_utf8(&comment)?.to_string()));
        },
        Event::Eof => break,
        // Declaration, processing instructions and doctype
        _ => (),
      }
    }

    if let Some(open) = builder.stack.last() {
      return Err(RulediffError::UnexpectedEof(open.name.to_string()));
    }
    builder.root.map(Document::new).ok_or(RulediffError::EmptyDocument)
  }

  /// Reads and parses a file.
  pub fn from_path(path: impl AsRef<Path>) -> Result<Document> {
    let path = path.as_ref();
    debug!("Reading ruleset from {}", path.display());
    let xml = std::fs::read_to_string(path)?;
    Document::parse(&xml)
  }
}

/// Assembles the tree from the flat event stream.
#[derive(Default)]
struct TreeBuilder {
  /// Elements opened but not yet closed
  stack:  Vec<Element>,
  /// Prefix bindings introduced by each open element
  scopes: Vec<HashMap<String, String>>,
  /// The finished root element
  root:   Option<Element>,
}

impl TreeBuilder {
  /// Builds an element from a start tag and pushes its namespace scope.
  fn open(&mut self, start: &BytesStart) -> Result<Element> {
    let name = QualifiedName::parse(std::str::from_utf8(start.name().as_ref())?);

    let mut attributes = Vec::new();
    let mut scope = HashMap::new();
    for attr in start.attributes() {
      let attr = attr?;
      let attribute = Attribute {
        name:      QualifiedName::parse(std::str::from_utf8(attr.key.as_ref())?),
        namespace: None,
        value:     attr.unescape_value()?.into_owned(),
      };
      if attribute.is_namespace_declaration() {
        let prefix = match &attribute.name.prefix {
          Some(_) => attribute.name.local.clone(),
          None => String::new(),
        };
        scope.insert(prefix, attribute.value.clone());
      }
      attributes.push(attribute);
    }
    self.scopes.push(scope);

    // Unprefixed attributes are in no namespace, unlike unprefixed elements.
    for attribute in attributes.iter_mut().filter(|a| !a.is_namespace_declaration()) {
      if let Some(prefix) = &attribute.name.prefix {
        attribute.namespace = Some(self.resolve(prefix)?);
      }
    }
    let namespace = match &name.prefix {
      Some(prefix) => Some(self.resolve(prefix)?),
      None => self.lookup("").filter(|uri| !uri.is_empty()),
    };

    trace!("Opened <{name}> in namespace {namespace:?}");
    Ok(Element { name, namespace, attributes, children: Vec::new() })
  }

  /// Resolves a prefix against the innermost declaration in scope.
  fn resolve(&self, prefix: &str) -> Result<String> {
    if prefix == "xml" {
      return Ok(XML_NAMESPACE.to_string());
    }
    self.lookup(prefix).ok_or_else(|| RulediffError::UnboundPrefix(prefix.to_string()))
  }

  /// Finds the innermost binding of a prefix; the empty prefix is the default namespace.
  fn lookup(&self, prefix: &str) -> Option<String> {
    self.scopes.iter().rev().find_map(|scope| scope.get(prefix).cloned())
  }

  /// Adds a closed element to its parent, or makes it the root.
  fn attach(&mut self, element: Element) {
    match self.stack.last_mut() {
      Some(parent) => parent.children.push(Node::Element(element)),
      None if self.root.is_none() => self.root = Some(element),
      None => warn!("Ignoring additional top-level element <{}>", element.name),
    }
  }

  /// Adds a non-element node to the innermost open element; top-level nodes are dropped.
  fn push_node(&mut self, node: Node) {
    if let Some(parent) = self.stack.last_mut() {
      parent.children.push(node);
    }
  }
}

/// Lazily loading reader for a ruleset file.
///
/// The file is only read and parsed the first time [`RulesetReader::document`] is called; the
/// parsed tree is cached for all later calls. The document is exposed for read-only traversal,
/// use [`RulesetReader::into_document`] to take ownership for mutation.
#[derive(Debug)]
pub struct RulesetReader {
  /// Location of the ruleset
  path:     PathBuf,
  /// Parsed document, filled on first access
  document: OnceCell<Document>,
}

impl RulesetReader {
  /// Creates a reader for the given path without touching the file.
  pub fn new(path: impl AsRef<Path>) -> Self {
    Self { path: path.as_ref().to_path_buf(), document: OnceCell::new() }
  }

  /// Location of the ruleset file.
  pub fn path(&self) -> &Path { &self.path }

  /// Whether the file has already been parsed.
  pub fn is_loaded(&self) -> bool { self.document.get().is_some() }

  /// Returns the parsed document, loading it on first use.
  ///
  /// A failed load is not cached, so a later call tries again.
  pub fn document(&self) -> Result<&Document> {
    if let Some(document) = self.document.get() {
      return Ok(document);
    }
    let document = Document::from_path(&self.path)?;
    Ok(self.document.get_or_init(|| document))
  }

  /// Consumes the reader and returns the owned document, loading it if needed.
  pub fn into_document(self) -> Result<Document> {
    match self.document.into_inner() {
      Some(document) => Ok(document),
      None => Document::from_path(&self.path),
    }
  }
}
