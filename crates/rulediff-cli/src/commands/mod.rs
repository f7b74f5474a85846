use super::*;

pub mod check;
pub mod compare;
pub mod init;
pub mod protected;

pub use check::{check, CheckOptions};
pub use compare::{compare, CompareOptions};
pub use init::init;
pub use protected::{protected, ProtectedOptions};

/// Available commands for the CLI
#[derive(Subcommand, Clone)]
pub enum Commands {
  /// Write the default configuration (to --config or the platform config directory)
  Init,

  /// Compare two rulesets and print the annotated diff document
  Compare(CompareOptions),

  /// List the protected elements of a ruleset
  Protected(ProtectedOptions),

  /// Check that every protected identity is unique among its siblings
  Check(CheckOptions),
}
