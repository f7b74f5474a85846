//! Command line interface for comparing Goobi/Kitodo rulesets with the `rulediff` library.
//!
//! # Usage
//!
//! ```bash
//! # Write a default configuration to the platform config directory
//! rulediff init
//!
//! # Print the annotated diff document of two ruleset revisions
//! rulediff compare ruleset_old.xml ruleset_new.xml
//!
//! # Write the diff document to a file and print the report as JSON
//! rulediff compare ruleset_old.xml ruleset_new.xml -o diff.xml --json
//!
//! # List the protected elements of a ruleset
//! rulediff protected ruleset.xml --filter '^Title'
//!
//! # Check that every protected identity is unique
//! rulediff check ruleset.xml
//! ```
//!
//! Logging goes to stderr and is controlled with `-v` (repeatable) or `RUST_LOG`.

#![warn(missing_docs, clippy::missing_docs_in_private_items)]

use std::path::{Path, PathBuf};

use clap::{builder::ArgAction, Args, Parser, Subcommand};
use console::style;
use rulediff::{
  element::{compare_documents, DiffReport},
  integrity::{Duplicate, Integrity, ProtectedElement},
  reader::RulesetReader,
  writer::write_document,
  Config,
};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

pub mod commands;
pub mod error;
pub mod interaction;

use crate::{commands::*, error::*, interaction::*};

/// Command line interface configuration and argument parsing
#[derive(Parser)]
#[command(author, version, about = "Identity-aware diff for Goobi/Kitodo XML rulesets")]
pub struct Cli {
  /// Verbose mode (-v, -vv, -vvv) for different levels of logging detail
  #[arg(
        short,
        long,
        action = ArgAction::Count,
        global = true,
        help = "Increase logging verbosity"
    )]
  verbose: u8,

  /// Path to the configuration file. If not specified, the file in the platform-specific config
  /// directory is used when present, otherwise built-in defaults apply.
  #[arg(long, short, global = true)]
  config: Option<PathBuf>,

  /// The subcommand to execute
  #[command(subcommand)]
  command: Commands,

  /// Skip all prompts and accept defaults (mostly for testing)
  #[arg(long, hide = true, global = true)]
  accept_defaults: bool,
}

impl Cli {
  /// Loads the configuration selected on the command line.
  fn load_config(&self) -> Result<Config> { Ok(Config::load(self.config.as_deref())?) }
}

/// Configures the logging system based on the verbosity level
///
/// The verbosity levels are:
/// - 0: error (default)
/// - 1: warn
/// - 2: info
/// - 3: debug
/// - 4+: trace
fn setup_logging(verbosity: u8) {
  let filter = match verbosity {
    0 => "error",
    1 => "warn",
    2 => "info",
    3 => "debug",
    _ => "trace",
  };

  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .with_file(true)
    .with_line_number(true)
    .with_target(true)
    .init();
}

/// Entry point for the rulediff CLI application
///
/// Parses the arguments, sets up logging and runs the requested command. Failures are reported
/// through the terminal interaction and end the process with exit code 1.
fn main() {
  let cli = Cli::parse();
  setup_logging(cli.verbose);

  let interaction = Terminal::new(cli.accept_defaults);
  let result = match cli.command.clone() {
    Commands::Init => init(&interaction, &cli),
    Commands::Compare(options) => compare(&interaction, &cli, options),
    Commands::Protected(options) => protected(&interaction, &cli, options),
    Commands::Check(options) => check(&interaction, &cli, options),
  };

  if let Err(error) = result {
    debug!("Command failed: {error:?}");
    let _ = interaction.reply(ResponseContent::Error(&error));
    std::process::exit(1);
  }
}
