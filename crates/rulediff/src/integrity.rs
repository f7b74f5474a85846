//! Registry of protected element classes.
//!
//! Some elements of a ruleset carry a unique identity in a designated child tag, for example
//! `<MetadataType><Name>TitleDocMain</Name>...</MetadataType>`. These elements are *protected*:
//! the comparison matches them by identity instead of by structure and never removes them from
//! the diff document, so every remaining change stays attached to the element it belongs to.
//!
//! Besides the registered classes, [`Integrity`] tracks the protected elements the comparison is
//! currently inside of (the *active watches*), innermost last.
//!
//! # Examples
//!
//! ```
//! use rulediff::prelude::*;
//!
//! let document =
//!   Document::parse("<Preferences><MetadataType><Name>Author</Name></MetadataType></Preferences>")
//!     .unwrap();
//! let integrity = Integrity::new().with_class(ProtectedClass::new("MetadataType", "Name"));
//!
//! let metadata = document.root.find_child("MetadataType").unwrap();
//! assert!(integrity.is_protected(metadata));
//! assert_eq!(integrity.identity(metadata).unwrap().to_string(), "MetadataType 'Author'");
//! ```

use regex::Regex;

use super::*;

/// An element class whose instances carry an identity in a child tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtectedClass {
  /// Local name of the protected element
  pub element: String,
  /// Local name of the child element holding the identity
  pub id_tag:  String,
}

impl ProtectedClass {
  /// Creates a protected class.
  pub fn new(element: impl Into<String>, id_tag: impl Into<String>) -> Self {
    Self { element: element.into(), id_tag: id_tag.into() }
  }
}

/// The identity of a protected element instance.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Identity {
  /// Local name of the element
  pub element: String,
  /// Trimmed text of the identity child
  pub id:      String,
}

impl Display for Identity {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{} '{}'", self.element, self.id)
  }
}

/// A protected element found in a document, with its location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtectedElement {
  /// Slash separated element path from the root, e.g. `Preferences/MetadataType`
  pub path:     String,
  /// The identity of the element
  pub identity: Identity,
}

/// An identity occurring more than once among the children of one parent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Duplicate {
  /// Path of the parent element
  pub parent:      String,
  /// The duplicated identity
  pub identity:    Identity,
  /// How often it occurs
  pub occurrences: usize,
}

/// Registry of protected element classes and active watch instances.
#[derive(Debug, Clone, Default)]
pub struct Integrity {
  /// Identity tag per protected element name
  classes: BTreeMap<String, String>,
  /// Protected elements currently being compared, innermost last
  watches: Vec<Identity>,
}

impl Integrity {
  /// Creates an empty registry; nothing is protected.
  pub fn new() -> Self { Self::default() }

  /// Creates a registry with the protected classes of a configuration.
  pub fn from_config(config: &Config) -> Self {
    let mut integrity = Self::new();
    for class in &config.protected {
      integrity.register(class.clone());
    }
    integrity
  }

  /// Builder variant of [`Integrity::register`].
  pub fn with_class(mut self, class: ProtectedClass) -> Self {
    self.register(class);
    self
  }

  /// Registers a protected class, replacing the identity tag of an earlier registration.
  pub fn register(&mut self, class: ProtectedClass) {
    if let Some(previous) = self.classes.insert(class.element.clone(), class.id_tag.clone()) {
      if previous != class.id_tag {
        warn!(
          "Protected class {} re-registered with id tag {} (was {})",
          class.element, class.id_tag, previous
        );
      }
    }
  }

  /// The registered classes, ordered by element name.
  pub fn classes(&self) -> impl Iterator<Item = ProtectedClass> + '_ {
    self.classes.iter().map(|(element, id_tag)| ProtectedClass::new(element, id_tag))
  }

  /// The identity tag registered for an element, if its class is protected.
  pub fn id_tag(&self, element: &Element) -> Option<&str> {
    self.classes.get(&element.name.local).map(String::as_str)
  }

  /// The identity of an element.
  ///
  /// Only elements of a registered class that have a non-empty identity child have one.
  pub fn identity(&self, element: &Element) -> Option<Identity> {
    let id_tag = self.id_tag(element)?;
    let id = element.find_child(id_tag)?.text();
    if id.is_empty() {
      return None;
    }
    Some(Identity { element: element.name.local.clone(), id })
  }

  /// Whether the element is an identity-protected unit.
  pub fn is_protected(&self, element: &Element) -> bool { self.identity(element).is_some() }

  /// Whether `child` is the identity-bearing tag of the protected element `parent`.
  pub fn is_id_child(&self, parent: &Element, child: &Element) -> bool {
    self.is_protected(parent) && self.id_tag(parent) == Some(child.name.local.as_str())
  }

  /// Whether any descendant of the element is protected.
  pub fn contains_protected(&self, element: &Element) -> bool {
    element.child_elements().any(|child| self.is_protected(child) || self.contains_protected(child))
  }

  /// Enters a protected element.
  pub fn watch(&mut self, identity: Identity) {
    trace!("Watching {identity}");
    self.watches.push(identity);
  }

  /// Leaves the innermost protected element.
  pub fn unwatch(&mut self) -> Option<Identity> {
    let identity = self.watches.pop();
    if let Some(identity) = &identity {
      trace!("Leaving {identity}");
    }
    identity
  }

  /// The protected elements currently being compared, innermost last.
  pub fn active_watches(&self) -> &[Identity] { &self.watches }

  /// The innermost protected element currently being compared.
  pub fn current_watch(&self) -> Option<&Identity> { self.watches.last() }

  /// Whether the identity is among the active watches.
  pub fn is_watched(&self, identity: &Identity) -> bool { self.watches.contains(identity) }

  /// Lists all protected elements of a document in document order.
  pub fn protected_elements(&self, document: &Document) -> Vec<ProtectedElement> {
    let mut found = Vec::new();
    self.collect_protected(&document.root, &document.root.name.local, &mut found);
    found
  }

  /// Lists the protected elements whose id matches a regular expression.
  pub fn protected_elements_matching(
    &self,
    document: &Document,
    pattern: &str,
  ) -> Result<Vec<ProtectedElement>> {
    let pattern = Regex::new(pattern)?;
    let mut found = self.protected_elements(document);
    found.retain(|element| pattern.is_match(&element.identity.id));
    Ok(found)
  }

  /// Depth-first helper for [`Integrity::protected_elements`].
  fn collect_protected(&self, element: &Element, path: &str, found: &mut Vec<ProtectedElement>) {
    if let Some(identity) = self.identity(element) {
      found.push(ProtectedElement { path: path.to_string(), identity });
    }
    for child in element.child_elements() {
      self.collect_protected(child, &format!("{path}/{}", child.name.local), found);
    }
  }

  /// Reports identities that occur more than once among the children of the same parent.
  pub fn duplicates(&self, document: &Document) -> Vec<Duplicate> {
    let mut duplicates = Vec::new();
    self.collect_duplicates(&document.root, &document.root.name.local, &mut duplicates);
    duplicates
  }

  /// Depth-first helper for [`Integrity::duplicates`].
  fn collect_duplicates(&self, element: &Element, path: &str, duplicates: &mut Vec<Duplicate>) {
    let mut counts: BTreeMap<Identity, usize> = BTreeMap::new();
    for child in element.child_elements() {
      if let Some(identity) = self.identity(child) {
        *counts.entry(identity).or_default() += 1;
      }
    }
    for (identity, occurrences) in counts.into_iter().filter(|(_, n)| *n > 1) {
      warn!("{identity} occurs {occurrences} times below {path}");
      duplicates.push(Duplicate { parent: path.to_string(), identity, occurrences });
    }

    for child in element.child_elements() {
      self.collect_duplicates(child, &format!("{path}/{}", child.name.local), duplicates);
    }
  }
}
