//! Error types for the rulediff library.
//!
//! All fallible operations return [`Result`], whose error type [`RulediffError`] covers:
//! - Malformed XML and undeclared namespace prefixes
//! - File system access
//! - Configuration loading and saving
//!
//! # Examples
//!
//! ```
//! use rulediff::{error::RulediffError, tree::Document};
//!
//! match Document::parse("<Preferences><MetadataType></Preferences>") {
//!   Err(RulediffError::Xml(e)) => println!("Malformed ruleset: {e}"),
//!   Err(e) => println!("Other error: {e}"),
//!   Ok(_) => unreachable!(),
//! }
//! ```

use quick_xml::events::attributes::AttrError;
use thiserror::Error;

/// Error type alias used for the [`rulediff`](crate) crate.
pub type Result<T> = core::result::Result<T, RulediffError>;

/// Errors that can occur while reading, comparing or writing rulesets.
#[derive(Error, Debug)]
pub enum RulediffError {
  /// The XML parser rejected the input.
  ///
  /// This covers mismatched end tags, invalid markup and syntax errors reported by
  /// `quick-xml`.
  #[error(transparent)]
  Xml(#[from] quick_xml::Error),

  /// An attribute could not be parsed, e.g. a duplicated or unquoted attribute.
  #[error(transparent)]
  Attribute(#[from] AttrError),

  /// Element names, text or attribute values are not valid UTF-8.
  #[error(transparent)]
  Utf8(#[from] std::str::Utf8Error),

  /// A file system operation failed.
  #[error(transparent)]
  Io(#[from] std::io::Error),

  /// The document contains no root element.
  #[error("Document has no root element")]
  EmptyDocument,

  /// The document ended while elements were still open.
  ///
  /// The string parameter names the innermost element that was never closed.
  #[error("Unexpected end of document inside <{0}>")]
  UnexpectedEof(String),

  /// A namespace prefix was used without a matching `xmlns:` declaration in scope.
  #[error("Namespace prefix \"{0}\" is not declared")]
  UnboundPrefix(String),

  /// A TOML configuration file could not be deserialized.
  #[error(transparent)]
  TomlDe(#[from] toml::de::Error),

  /// The configuration could not be serialized to TOML.
  #[error(transparent)]
  TomlSer(#[from] toml::ser::Error),

  /// A filter pattern is not a valid regular expression.
  #[error(transparent)]
  Pattern(#[from] regex::Error),

  /// A diff report could not be serialized to JSON.
  #[error(transparent)]
  Json(#[from] serde_json::Error),

  /// The configuration is inconsistent.
  #[error("{0}")]
  Config(String),
}
