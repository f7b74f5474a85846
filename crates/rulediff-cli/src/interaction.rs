//! Terminal output and prompts.
//!
//! Commands talk to the user only through [`UserInteraction`], so output formatting lives in one
//! place. Documents and JSON go to stdout, everything else to stderr, which keeps
//! `rulediff compare a.xml b.xml > diff.xml` usable.

use dialoguer::Confirm;

use super::*;

/// Prefix for information messages
pub static INFO_PREFIX: &str = "ℹ ";
/// Prefix for success messages
pub static SUCCESS_PREFIX: &str = "✓ ";
/// Prefix for error messages
pub static ERROR_PREFIX: &str = "✗ ";
/// Prefix for warning messages
pub static WARNING_PREFIX: &str = "! ";
/// Prefix for user prompts
pub static PROMPT_PREFIX: &str = "❯ ";
/// Prefix for list entries
pub static ITEM_PREFIX: &str = "├─";
/// Prefix for the last list entry
pub static LAST_ITEM_PREFIX: &str = "└─";

/// Something to show to the user.
#[derive(Debug)]
pub enum ResponseContent<'a> {
  /// An XML document, printed verbatim to stdout
  Document(&'a str),
  /// A JSON report, printed verbatim to stdout
  Json(&'a str),
  /// The summary of a comparison
  Report(&'a DiffReport),
  /// Protected elements of a ruleset
  Protected(&'a [ProtectedElement]),
  /// Duplicated identities of a ruleset
  Duplicates(&'a [Duplicate]),
  /// A completed action
  Success(&'a str),
  /// A neutral message
  Info(&'a str),
  /// A failed command
  Error(&'a RulediffCliError),
}

/// How commands interact with the user.
pub trait UserInteraction {
  /// Asks a yes/no question.
  fn confirm(&self, message: &str) -> Result<bool>;
  /// Shows a response.
  fn reply(&self, content: ResponseContent) -> Result<()>;
}

/// Interaction on the terminal with `console` styling and `dialoguer` prompts.
pub struct Terminal {
  /// Answer every prompt with its default instead of asking
  accept_defaults: bool,
}

impl Terminal {
  /// Creates the terminal interaction.
  pub fn new(accept_defaults: bool) -> Self { Self { accept_defaults } }
}

impl UserInteraction for Terminal {
  fn confirm(&self, message: &str) -> Result<bool> {
    if self.accept_defaults {
      debug!("Accepting default for prompt: {message}");
      return Ok(true);
    }
    Ok(Confirm::new().with_prompt(format!("{}{message}", style(PROMPT_PREFIX).cyan())).default(false).interact()?)
  }

  fn reply(&self, content: ResponseContent) -> Result<()> {
    match content {
      ResponseContent::Document(xml) => print!("{xml}"),
      ResponseContent::Json(json) => println!("{json}"),
      ResponseContent::Report(report) =>
        if report.is_identical() {
          eprintln!("{} Rulesets are identical ({report})", style(SUCCESS_PREFIX).green());
        } else {
          eprintln!(
            "{} Found {} differences: {report}",
            style(WARNING_PREFIX).yellow(),
            style(report.changes.len()).yellow().bold()
          );
        },
      ResponseContent::Protected(found) => {
        eprintln!("{} {} protected elements", style(INFO_PREFIX).blue(), style(found.len()).bold());
        for (i, element) in found.iter().enumerate() {
          let prefix = if i + 1 == found.len() { LAST_ITEM_PREFIX } else { ITEM_PREFIX };
          println!("{prefix} {} {}", style(&element.identity).bold(), style(&element.path).dim());
        }
      },
      ResponseContent::Duplicates(duplicates) => {
        eprintln!(
          "{} {} duplicate identities",
          style(WARNING_PREFIX).yellow(),
          style(duplicates.len()).yellow().bold()
        );
        for (i, duplicate) in duplicates.iter().enumerate() {
          let prefix = if i + 1 == duplicates.len() { LAST_ITEM_PREFIX } else { ITEM_PREFIX };
          println!(
            "{prefix} {} occurs {} times below {}",
            style(&duplicate.identity).bold(),
            duplicate.occurrences,
            style(&duplicate.parent).dim()
          );
        }
      },
      ResponseContent::Success(message) => eprintln!("{} {message}", style(SUCCESS_PREFIX).green()),
      ResponseContent::Info(message) => eprintln!("{} {message}", style(INFO_PREFIX).blue()),
      ResponseContent::Error(error) => eprintln!("{} {error}", style(ERROR_PREFIX).red()),
    }
    Ok(())
  }
}
