//! Recursive element comparison and reconciliation.
//!
//! [`Comparator::compare`] walks a source and a target element tree together:
//!
//! - Non-protected target children that are [`deep_equal`] to a source child are removed
//! - Protected children are paired by [`Identity`], compared recursively and kept
//! - Non-protected children with protected descendants are paired by name and compared
//!   recursively instead of being removed as a whole
//! - Every divergence becomes an XML comment in the target and a [`Change`] in the
//!   [`DiffReport`]
//!
//! What is left of the target afterwards is the diff document: the protected skeleton plus
//! everything that is new or different, annotated.
//!
//! # Examples
//!
//! ```
//! use rulediff::{element::compare_documents, prelude::*, Config};
//!
//! # fn main() -> Result<(), RulediffError> {
//! let source = Document::parse(
//!   "<Preferences><MetadataType><Name>Author</Name><language name=\"de\">Autor</language></MetadataType></Preferences>",
//! )?;
//! let target = Document::parse(
//!   "<Preferences><MetadataType><Name>Author</Name><language name=\"de\">Verfasser</language></MetadataType></Preferences>",
//! )?;
//!
//! let config = Config::default();
//! let mut integrity = Integrity::from_config(&config);
//! let diff = compare_documents(&source, target, &mut integrity, &config.options())?;
//!
//! assert!(!diff.report.is_identical());
//! assert_eq!(diff.report.protected_changed, 1);
//! # Ok(())
//! # }
//! ```

use crate::attribute::{attributes_equal, compare_attributes, find_attribute};

use super::*;

/// Options controlling how divergences are recorded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
  /// Text every annotation comment starts with
  pub comment_prefix:  String,
  /// Remove protected elements (and containers) that compared equal
  pub prune_unchanged: bool,
}

impl Default for Options {
  fn default() -> Self { Self { comment_prefix: "rulediff".to_string(), prune_unchanged: false } }
}

/// Kind of a recorded divergence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
  /// The compared elements have different names
  NameDiffers,
  /// An attribute exists on both sides with different values
  AttributeDiffers,
  /// An attribute exists only in the source
  AttributeOnlyInSource,
  /// An attribute exists only in the target
  AttributeOnlyInTarget,
  /// The direct text content differs
  TextDiffers,
  /// A source subtree has no equal counterpart in the target
  OnlyInSource,
  /// A target subtree has no counterpart in the source
  OnlyInTarget,
  /// A protected element is missing from the target
  ProtectedOnlyInSource,
  /// A protected element is new in the target
  ProtectedOnlyInTarget,
}

/// A single divergence found during comparison.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Change {
  /// Innermost protected element the divergence was found in
  pub context: Option<Identity>,
  /// What kind of divergence this is
  pub kind:    ChangeKind,
  /// Human readable description, also used as comment text
  pub detail:  String,
}

/// Summary of a comparison.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffReport {
  /// Equal subtrees removed from the target
  pub removed:               usize,
  /// Protected elements found on both sides
  pub protected_matched:     usize,
  /// Protected elements found on both sides whose content differs
  pub protected_changed:     usize,
  /// Subtrees and protected elements only present in the source
  pub only_in_source:        usize,
  /// Subtrees and protected elements only present in the target
  pub only_in_target:        usize,
  /// Differing, missing or additional attributes
  pub attribute_differences: usize,
  /// Differing text contents
  pub text_differences:      usize,
  /// Every recorded divergence in recording order
  pub changes:               Vec<Change>,
}

impl DiffReport {
  /// Whether no divergence was found.
  pub fn is_identical(&self) -> bool { self.changes.is_empty() }

  /// The report as pretty printed JSON.
  pub fn to_json(&self) -> Result<String> { Ok(serde_json::to_string_pretty(self)?) }
}

impl Display for DiffReport {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(
      f,
      "{} equal removed, {} protected matched ({} changed), {} only in source, {} only in target, \
       {} attribute and {} text differences",
      self.removed,
      self.protected_matched,
      self.protected_changed,
      self.only_in_source,
      self.only_in_target,
      self.attribute_differences,
      self.text_differences,
    )
  }
}

/// Result of [`compare_documents`].
#[derive(Debug, Clone)]
pub struct Diff {
  /// The annotated, reduced target document
  pub document: Document,
  /// What was found
  pub report:   DiffReport,
}

/// Compares two documents and returns the annotated target as diff document.
///
/// The root element is compared like any protected element: it is never removed. A protected
/// root with the same identity on both sides is watched, so its changes carry it as context.
pub fn compare_documents(
  source: &Document,
  mut target: Document,
  integrity: &mut Integrity,
  options: &Options,
) -> Result<Diff> {
  debug!("Comparing <{}> against <{}>", source.root.name, target.root.name);
  let root_identity = integrity
    .identity(&source.root)
    .filter(|identity| integrity.identity(&target.root).as_ref() == Some(identity));
  let watched = root_identity.is_some();
  if let Some(identity) = root_identity {
    integrity.watch(identity);
  }

  let mut comparator = Comparator::new(integrity, options);
  let equal = comparator.compare(&source.root, &mut target.root);
  let report = comparator.into_report();
  if watched {
    integrity.unwatch();
  }
  let equal = equal?;
  debug!("Comparison finished, equal: {equal}, {report}");
  Ok(Diff { document: target, report })
}

/// Structural equality of two element trees.
///
/// Names, attribute sets and direct text must be equal, and the child elements must pair up
/// one-to-one with deep-equal partners in any order. Comments are ignored.
pub fn deep_equal(a: &Element, b: &Element) -> bool {
  a.same_name(b)
    && attributes_equal(&a.attributes, &b.attributes)
    && a.text() == b.text()
    && children_equal(a, b)
}

/// Order-insensitive pairing of child elements for [`deep_equal`].
fn children_equal(a: &Element, b: &Element) -> bool {
  let theirs: Vec<&Element> = b.child_elements().collect();
  if a.child_elements().count() != theirs.len() {
    return false;
  }
  let mut used = vec![false; theirs.len()];
  for child in a.child_elements() {
    match (0..theirs.len()).find(|&i| !used[i] && deep_equal(child, theirs[i])) {
      Some(i) => used[i] = true,
      None => return false,
    }
  }
  true
}

/// What happens to a target child after reconciliation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
  /// No source counterpart found (yet)
  Unmatched,
  /// Stays in the diff document
  Kept,
  /// Dropped from the diff document
  Removed,
}

/// Recursive comparison of element trees, mutating the target.
pub struct Comparator<'a> {
  /// Protected classes and the watch stack
  integrity: &'a mut Integrity,
  /// How to annotate
  options:   &'a Options,
  /// Accumulated findings
  report:    DiffReport,
}

impl<'a> Comparator<'a> {
  /// Creates a comparator with an empty report.
  pub fn new(integrity: &'a mut Integrity, options: &'a Options) -> Self {
    Self { integrity, options, report: DiffReport::default() }
  }

  /// The findings so far.
  pub fn report(&self) -> &DiffReport { &self.report }

  /// Consumes the comparator and returns its findings.
  pub fn into_report(self) -> DiffReport { self.report }

  /// Compares `source` with `target`, returning whether they are structurally equal.
  ///
  /// Equal non-protected children of `target` are removed and every divergence is annotated in
  /// `target` as a comment. The root `target` itself is never removed.
  pub fn compare(&mut self, source: &Element, target: &mut Element) -> Result<bool> {
    if !source.same_name(target) {
      let note = self.note(
        ChangeKind::NameDiffers,
        format!("element name differs, source has <{}>", source.name),
      );
      target.children.insert(0, note);
      return Ok(false);
    }

    let mut notes = Vec::new();
    let attributes_equal = self.compare_attribute_lists(source, target, &mut notes);
    let text_equal = self.compare_text(source, target, &mut notes);
    let children_equal = self.reconcile_children(source, target, notes)?;
    Ok(attributes_equal && text_equal && children_equal)
  }

  /// Records a divergence and returns the comment annotating it.
  fn note(&mut self, kind: ChangeKind, detail: String) -> Node {
    let context = self.integrity.current_watch().cloned();
    match &context {
      Some(identity) => trace!("{kind:?} in {identity}: {detail}"),
      None => trace!("{kind:?}: {detail}"),
    }
    let comment = format!(" {}: {} ", self.options.comment_prefix, detail);
    self.report.changes.push(Change { context, kind, detail });
    Node::Comment(comment)
  }

  /// Compares the attribute lists, ignoring namespace declarations.
  fn compare_attribute_lists(
    &mut self,
    source: &Element,
    target: &Element,
    notes: &mut Vec<Node>,
  ) -> bool {
    let mut equal = true;
    for attr in source.attributes.iter().filter(|attr| !attr.is_namespace_declaration()) {
      let (kind, detail) = match find_attribute(&target.attributes, attr) {
        Some(other) if compare_attributes(attr, other).value_matched => continue,
        Some(_) => (
          ChangeKind::AttributeDiffers,
          format!("attribute {} differs, source has \"{}\"", attr.name, attr.value),
        ),
        None => (
          ChangeKind::AttributeOnlyInSource,
          format!("attribute {}=\"{}\" only in source", attr.name, attr.value),
        ),
      };
      equal = false;
      self.report.attribute_differences += 1;
      notes.push(self.note(kind, detail));
    }

    for attr in target.attributes.iter().filter(|attr| !attr.is_namespace_declaration()) {
      if find_attribute(&source.attributes, attr).is_none() {
        equal = false;
        self.report.attribute_differences += 1;
        notes.push(
          self.note(ChangeKind::AttributeOnlyInTarget, format!("attribute {} only in target", attr.name)),
        );
      }
    }
    equal
  }

  /// Compares the direct text content.
  fn compare_text(&mut self, source: &Element, target: &Element, notes: &mut Vec<Node>) -> bool {
    let source_text = source.text();
    if source_text == target.text() {
      return true;
    }
    self.report.text_differences += 1;
    notes.push(self.note(ChangeKind::TextDiffers, format!("text differs, source has \"{source_text}\"")));
    false
  }

  /// Pairs the children of both elements, removes equal ones from the target and annotates the
  /// rest. `notes` are placed in front of the remaining children.
  ///
  /// Protected and plain children are paired first. Containers only pair with the target
  /// children that are still unmatched afterwards, so they never take a plain child's partner.
  fn reconcile_children(
    &mut self,
    source: &Element,
    target: &mut Element,
    notes: Vec<Node>,
  ) -> Result<bool> {
    // The identity child is skipped only when both sides carry the same identity
    let same_identity = self
      .integrity
      .identity(source)
      .is_some_and(|identity| self.integrity.identity(target).as_ref() == Some(&identity));

    let mut slots: Vec<Slot> = target
      .children
      .iter()
      .map(|child| match child {
        Node::Element(element) if !(same_identity && self.integrity.is_id_child(target, element)) =>
          Slot::Unmatched,
        // Text, comments and the identity child stay as they are
        _ => Slot::Kept,
      })
      .collect();
    let mut children = std::mem::take(&mut target.children);

    let mut equal = true;
    let mut missing: Vec<(usize, Node)> = Vec::new();
    let mut containers = Vec::new();
    for (index, child) in source.child_elements().enumerate() {
      if same_identity && self.integrity.is_id_child(source, child) {
        continue;
      }

      if let Some(identity) = self.integrity.identity(child) {
        let found = (0..children.len()).find(|&i| {
          slots[i] == Slot::Unmatched
            && children[i].as_element().is_some_and(|other| {
              child.same_name(other) && self.integrity.identity(other).as_ref() == Some(&identity)
            })
        });
        let Some(i) = found else {
          equal = false;
          self.report.only_in_source += 1;
          let note = self.note(ChangeKind::ProtectedOnlyInSource, format!("{identity} only in source"));
          missing.push((index, note));
          continue;
        };

        self.integrity.watch(identity);
        let child_equal = match children[i].as_element_mut() {
          Some(other) => self.compare(child, other),
          None => Ok(false),
        };
        self.integrity.unwatch();

        self.report.protected_matched += 1;
        if child_equal? {
          slots[i] = if self.options.prune_unchanged { Slot::Removed } else { Slot::Kept };
        } else {
          equal = false;
          self.report.protected_changed += 1;
          slots[i] = Slot::Kept;
        }
      } else if self.integrity.contains_protected(child) {
        containers.push((index, child));
      } else {
        let found = (0..children.len()).find(|&i| {
          slots[i] == Slot::Unmatched && children[i].as_element().is_some_and(|other| deep_equal(child, other))
        });
        match found {
          Some(i) => {
            slots[i] = Slot::Removed;
            self.report.removed += 1;
          },
          None => {
            equal = false;
            self.report.only_in_source += 1;
            let note =
              self.note(ChangeKind::OnlyInSource, format!("only in source: {}", child.to_compact_string()?));
            missing.push((index, note));
          },
        }
      }
    }

    for (index, child) in containers {
      let candidate = |i: usize, strict: bool| {
        slots[i] == Slot::Unmatched
          && children[i].as_element().is_some_and(|other| {
            child.same_name(other)
              && !self.integrity.is_protected(other)
              && (!strict || attributes_equal(&child.attributes, &other.attributes))
          })
      };
      let found = (0..children.len())
        .find(|&i| candidate(i, true))
        .or_else(|| (0..children.len()).find(|&i| candidate(i, false)));
      let Some(i) = found else {
        equal = false;
        self.report.only_in_source += 1;
        let note =
          self.note(ChangeKind::OnlyInSource, format!("only in source: {}", child.to_compact_string()?));
        missing.push((index, note));
        continue;
      };

      let child_equal = match children[i].as_element_mut() {
        Some(other) => self.compare(child, other)?,
        None => false,
      };
      equal &= child_equal;
      slots[i] = if child_equal && self.options.prune_unchanged { Slot::Removed } else { Slot::Kept };
    }

    let mut rebuilt = notes;
    for (child, slot) in children.drain(..).zip(slots) {
      match slot {
        Slot::Removed => continue,
        Slot::Kept => rebuilt.push(child),
        Slot::Unmatched => {
          equal = false;
          self.report.only_in_target += 1;
          let identity = child.as_element().and_then(|element| self.integrity.identity(element));
          let note = match identity {
            Some(identity) =>
              self.note(ChangeKind::ProtectedOnlyInTarget, format!("{identity} only in target")),
            None => self.note(ChangeKind::OnlyInTarget, "only in target".to_string()),
          };
          rebuilt.push(note);
          rebuilt.push(child);
        },
      }
    }
    // Missing source children are listed in source order
    missing.sort_by_key(|(index, _)| *index);
    rebuilt.extend(missing.into_iter().map(|(_, note)| note));
    target.children = rebuilt;
    Ok(equal)
  }
}
