//! Attribute comparison.

use super::*;

/// Outcome of comparing two attributes.
///
/// Name and namespace are tracked separately from the value, so a caller can tell "the same
/// attribute with a different value" from "a different attribute".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AttributeMatch {
  /// Local names are equal
  pub name_matched:      bool,
  /// Resolved namespace URIs are equal
  pub namespace_matched: bool,
  /// Values are equal
  pub value_matched:     bool,
}

impl AttributeMatch {
  /// Both attributes denote the same attribute, whatever their values.
  pub fn is_same_attribute(&self) -> bool { self.name_matched && self.namespace_matched }

  /// Both attributes are fully equal.
  pub fn is_equal(&self) -> bool { self.is_same_attribute() && self.value_matched }
}

/// Compares two attributes.
///
/// Prefixes are ignored; `u:lang` and `v:lang` match when both prefixes are bound to the same URI.
pub fn compare_attributes(a: &Attribute, b: &Attribute) -> AttributeMatch {
  AttributeMatch {
    name_matched:      a.name.local == b.name.local,
    namespace_matched: a.namespace == b.namespace,
    value_matched:     a.value == b.value,
  }
}

/// Finds the attribute denoting the same attribute as `needle`, ignoring declarations.
pub fn find_attribute<'a>(attributes: &'a [Attribute], needle: &Attribute) -> Option<&'a Attribute> {
  attributes
    .iter()
    .filter(|attr| !attr.is_namespace_declaration())
    .find(|attr| compare_attributes(needle, attr).is_same_attribute())
}

/// Order-insensitive equality of two attribute lists, ignoring namespace declarations.
pub fn attributes_equal(a: &[Attribute], b: &[Attribute]) -> bool {
  let relevant = |attrs: &[Attribute]| attrs.iter().filter(|attr| !attr.is_namespace_declaration()).count();
  if relevant(a) != relevant(b) {
    return false;
  }
  a.iter()
    .filter(|attr| !attr.is_namespace_declaration())
    .all(|attr| find_attribute(b, attr).is_some_and(|other| compare_attributes(attr, other).is_equal()))
}

#[cfg(test)]
mod tests {
  use super::*;

  fn namespaced(prefix: &str, local: &str, namespace: &str, value: &str) -> Attribute {
    Attribute {
      name:      QualifiedName { prefix: Some(prefix.into()), local: local.into() },
      namespace: Some(namespace.into()),
      value:     value.into(),
    }
  }

  #[traced_test]
  #[test]
  fn test_value_mismatch_keeps_name_match() {
    let result = compare_attributes(&Attribute::new("name", "de"), &Attribute::new("name", "en"));
    assert!(result.name_matched);
    assert!(result.namespace_matched);
    assert!(!result.value_matched);
    assert!(result.is_same_attribute());
    assert!(!result.is_equal());
  }

  #[traced_test]
  #[test]
  fn test_namespace_decides_over_prefix() {
    let a = namespaced("u", "lang", "urn:ugh", "de");
    let b = namespaced("v", "lang", "urn:ugh", "de");
    assert!(compare_attributes(&a, &b).is_equal());

    let c = namespaced("u", "lang", "urn:other", "de");
    let result = compare_attributes(&a, &c);
    assert!(result.name_matched && result.value_matched);
    assert!(!result.namespace_matched);
    assert!(!result.is_same_attribute());
  }

  #[traced_test]
  #[test]
  fn test_attribute_sets() {
    let a = vec![Attribute::new("name", "de"), Attribute::new("type", "person")];
    let b = vec![
      Attribute::new("xmlns", "urn:ruleset"),
      Attribute::new("type", "person"),
      Attribute::new("name", "de"),
    ];
    assert!(attributes_equal(&a, &b));
    assert!(attributes_equal(&[], &[Attribute::new("xmlns", "urn:ruleset")]));
    assert!(!attributes_equal(&a, &b[1..2]));
    assert!(!attributes_equal(&a, &[Attribute::new("name", "de"), Attribute::new("type", "x")]));
    assert_eq!(find_attribute(&b, &Attribute::new("type", "")).map(|a| a.value.as_str()), Some("person"));
  }
}
