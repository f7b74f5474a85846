//! Module for writing a default [`Config`].

use super::*;

/// Function for the [`Commands::Init`] in the CLI.
pub fn init<I: UserInteraction>(interaction: &I, cli: &Cli) -> Result<()> {
  let path = cli.config.clone().unwrap_or_else(Config::default_path);

  if path.exists()
    && !interaction
      .confirm(&format!("A configuration already exists at {}, overwrite it?", path.display()))?
  {
    interaction.reply(ResponseContent::Info(
      "Keeping the existing configuration. Pass another location with --config",
    ))?;
    return Ok(());
  }

  Config::default().save(&path)?;
  info!("Wrote default configuration to {}", path.display());
  interaction.reply(ResponseContent::Success(&format!(
    "Created configuration at {}",
    path.display()
  )))?;
  Ok(())
}
