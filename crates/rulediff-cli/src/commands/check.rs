//! Module for checking that protected identities are unique.

use super::*;

#[derive(Args, Clone)]
pub struct CheckOptions {
  /// The ruleset to check
  pub ruleset: PathBuf,
}

/// Function for the [`Commands::Check`] in the CLI.
pub fn check<I: UserInteraction>(
  interaction: &I,
  cli: &Cli,
  check_options: CheckOptions,
) -> Result<()> {
  let config = cli.load_config()?;
  let integrity = Integrity::from_config(&config);
  let reader = RulesetReader::new(check_options.ruleset);
  let document = reader.document()?;

  let duplicates = integrity.duplicates(document);
  if duplicates.is_empty() {
    let count = integrity.protected_elements(document).len();
    interaction.reply(ResponseContent::Success(&format!(
      "All {count} protected identities are unique"
    )))?;
    return Ok(());
  }

  interaction.reply(ResponseContent::Duplicates(&duplicates))?;
  Err(RulediffCliError::DuplicateIdentities(duplicates.len()))
}
