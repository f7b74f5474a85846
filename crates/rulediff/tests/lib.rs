use std::{
  error::Error,
  path::{Path, PathBuf},
};

use rulediff::{
  element::{compare_documents, ChangeKind, Diff},
  prelude::*,
  reader::RulesetReader,
  writer::write_document,
  Config,
};
use tempfile::tempdir;
use tracing_test::traced_test;

mod compare;
mod integrity;

pub type TestResult<T> = Result<T, Box<dyn Error>>;

/// Path of a fixture below `tests/data`.
pub fn fixture(name: &str) -> PathBuf { Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/data").join(name) }

/// Compares the old against the new fixture ruleset with the given configuration.
pub fn compare_fixtures(config: &Config) -> TestResult<Diff> {
  let source = RulesetReader::new(fixture("ruleset_old.xml"));
  let target = RulesetReader::new(fixture("ruleset_new.xml")).into_document()?;
  let mut integrity = Integrity::from_config(config);
  Ok(compare_documents(source.document()?, target, &mut integrity, &config.options())?)
}

/// The protected child of `parent` with the given identity.
pub fn protected<'a>(parent: &'a Element, element: &str, id: &str) -> Option<&'a Element> {
  parent
    .child_elements()
    .find(|child| child.name.local == element && child.find_child("Name").map(Element::text).as_deref() == Some(id))
}
