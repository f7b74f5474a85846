//! Errors of the command line front end.

use rulediff::error::RulediffError;
use thiserror::Error;

/// Error type alias used throughout the CLI.
pub type Result<T> = core::result::Result<T, RulediffCliError>;

/// Everything that can make a command fail.
#[derive(Error, Debug)]
pub enum RulediffCliError {
  /// Reading, comparing or writing a ruleset failed.
  #[error(transparent)]
  Rulediff(#[from] RulediffError),

  /// An interactive prompt could not be shown.
  #[error(transparent)]
  Dialog(#[from] dialoguer::Error),

  /// Writing to the terminal or a file failed.
  #[error(transparent)]
  Io(#[from] std::io::Error),

  /// The integrity check found identities occurring more than once.
  #[error("Found {0} duplicate identities")]
  DuplicateIdentities(usize),
}
