//! Identity-aware comparison of Goobi/Kitodo XML rulesets.
//!
//! `rulediff` compares two revisions of a ruleset and produces an annotated diff document:
//!
//! - Subtrees of the target that are structurally equal to one in the source are removed
//! - Protected elements (those carrying a unique identity in a designated child tag, such as
//!   `<MetadataType><Name>TitleDocMain</Name>`) are never removed and act as anchors
//! - Every divergence is recorded as an XML comment in the target
//!
//! # Getting Started
//!
//! ```no_run
//! use rulediff::{element::compare_documents, prelude::*, reader::RulesetReader, Config};
//!
//! # fn main() -> Result<(), RulediffError> {
//! let config = Config::default();
//! let source = RulesetReader::new("ruleset_old.xml");
//! let target = RulesetReader::new("ruleset_new.xml").into_document()?;
//!
//! let mut integrity = Integrity::from_config(&config);
//! let diff = compare_documents(source.document()?, target, &mut integrity, &config.options())?;
//!
//! println!("{}", diff.document.to_xml_string(config.indent)?);
//! println!("identical: {}", diff.report.is_identical());
//! # Ok(())
//! # }
//! ```
//!
//! # Module Organization
//!
//! - [`tree`]: In-memory XML document model
//! - [`reader`]: Parsing and lazy loading of ruleset files
//! - [`writer`]: Serialization of (annotated) documents
//! - [`integrity`]: Registry of protected element classes and active watches
//! - [`attribute`]: Attribute comparison
//! - [`element`]: Recursive element comparison and reconciliation
//! - [`configuration`]: TOML configuration
//! - [`error`]: Error types

#![warn(missing_docs, clippy::missing_docs_in_private_items)]

use std::{
  collections::BTreeMap,
  fmt::Display,
  path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};
#[cfg(test)]
use {tempfile::tempdir, tracing_test::traced_test};

pub mod attribute;
pub mod configuration;
pub mod element;
pub mod error;
pub mod integrity;
pub mod reader;
pub mod tree;
pub mod writer;

pub use configuration::Config;

use crate::{error::*, integrity::*, tree::*};

/// Common traits and types for ergonomic imports.
///
/// ```no_run
/// use rulediff::prelude::*;
///
/// fn example() -> Result<(), RulediffError> {
///   let document = Document::parse("<Preferences/>")?;
///   assert_eq!(document.root.name.local, "Preferences");
///   Ok(())
/// }
/// ```
pub mod prelude {
  pub use crate::{
    error::RulediffError,
    integrity::{Identity, Integrity, ProtectedClass},
    tree::{Attribute, Document, Element, Node, QualifiedName},
  };
}
