use crate::dispatch::{Registry, render_commands, synopsis};
use clap::{CommandFactory as _, FromArgMatches as _, Parser};
use std::ffi::OsString;

/// Name the binary reports in usage text
pub const PROGRAM: &str = "cmdchain";

/// Global command-line arguments for cmdchain
///
/// Global options come first; the first positional token starts the
/// command chain and everything from there on belongs to the commands.
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "cmdchain")]
#[command(about = "Run several chained commands from one command line, concurrently")]
#[command(long_about = None)]
#[command(version)]
pub struct Args {
    /// Configuration file path
    #[arg(long, value_name = "PATH", env = "CMDCHAIN_CONFIG")]
    pub config: Option<String>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Commands to run, each followed by its own options
    #[arg(value_name = "COMMAND", trailing_var_arg = true)]
    pub commands: Vec<String>,
}

/// Global argument parser with the registered commands in its help
#[must_use]
pub fn build_cli(registry: &Registry) -> clap::Command {
    Args::command()
        .override_usage(synopsis(PROGRAM))
        .after_help(render_commands(registry))
}

/// Parse global arguments, `argv` starting with the program name
///
/// # Errors
///
/// Returns the clap error for invalid global options, `--help` and
/// `--version`.
pub fn parse_from<I, T>(argv: I, registry: &Registry) -> Result<Args, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let matches = build_cli(registry).try_get_matches_from(argv)?;
    Args::from_arg_matches(&matches)
}
