//! Module for comparing two rulesets.

use super::*;

#[derive(Args, Clone)]
pub struct CompareOptions {
  /// The reference ruleset
  pub source: PathBuf,

  /// The ruleset to reduce to its differences
  pub target: PathBuf,

  /// Write the diff document to this file instead of stdout
  #[arg(long, short)]
  pub output: Option<PathBuf>,

  /// Print the report as JSON instead of the diff document
  #[arg(long)]
  pub json: bool,

  /// Drop protected elements that did not change
  #[arg(long)]
  pub prune: bool,
}

/// Function for the [`Commands::Compare`] in the CLI.
pub fn compare<I: UserInteraction>(
  interaction: &I,
  cli: &Cli,
  compare_options: CompareOptions,
) -> Result<()> {
  let CompareOptions { source, target, output, json, prune } = compare_options;

  let mut config = cli.load_config()?;
  config.prune_unchanged |= prune;

  let source = RulesetReader::new(source);
  let target = RulesetReader::new(target);
  info!("Comparing {} against {}", source.path().display(), target.path().display());

  let mut integrity = Integrity::from_config(&config);
  let diff =
    compare_documents(source.document()?, target.into_document()?, &mut integrity, &config.options())?;

  match output {
    Some(path) => write_output(interaction, &path, &diff.document, config.indent)?,
    None if !json =>
      interaction.reply(ResponseContent::Document(&diff.document.to_xml_string(config.indent)?))?,
    None => (),
  }
  if json {
    interaction.reply(ResponseContent::Json(&diff.report.to_json()?))?;
  }
  interaction.reply(ResponseContent::Report(&diff.report))?;
  Ok(())
}

/// Writes the diff document, asking before replacing an existing file.
fn write_output<I: UserInteraction>(
  interaction: &I,
  path: &Path,
  document: &rulediff::tree::Document,
  indent: usize,
) -> Result<()> {
  if path.exists()
    && !interaction.confirm(&format!("{} already exists, overwrite it?", path.display()))?
  {
    interaction.reply(ResponseContent::Info("Diff document not written"))?;
    return Ok(());
  }
  write_document(path, document, indent)?;
  interaction
    .reply(ResponseContent::Success(&format!("Wrote diff document to {}", path.display())))?;
  Ok(())
}
