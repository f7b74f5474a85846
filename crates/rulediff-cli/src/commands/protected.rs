//! Module for listing the protected elements of a ruleset.

use super::*;

#[derive(Args, Clone)]
pub struct ProtectedOptions {
  /// The ruleset to inspect
  pub ruleset: PathBuf,

  /// Only list identities matching this regular expression
  #[arg(long)]
  pub filter: Option<String>,
}

/// Function for the [`Commands::Protected`] in the CLI.
pub fn protected<I: UserInteraction>(
  interaction: &I,
  cli: &Cli,
  protected_options: ProtectedOptions,
) -> Result<()> {
  let ProtectedOptions { ruleset, filter } = protected_options;

  let config = cli.load_config()?;
  let integrity = Integrity::from_config(&config);
  let reader = RulesetReader::new(ruleset);
  let document = reader.document()?;

  let found = match filter {
    Some(pattern) => integrity.protected_elements_matching(document, &pattern)?,
    None => integrity.protected_elements(document),
  };
  debug!("{} protected elements listed", found.len());

  interaction.reply(ResponseContent::Protected(&found))?;
  Ok(())
}
