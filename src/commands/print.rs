//! `print` - write a message to stdout

use crate::command::{Command, Flags};
use crate::error::ChainError;
use crate::runtime::{CancelToken, Waiter};
use clap::Arg;

/// Prints its `--message` once and completes synchronously
#[derive(Debug, Clone)]
pub struct PrintCommand {
    flags: Flags,
    message: String,
}

impl PrintCommand {
    /// Create a `print` command with an empty message
    #[must_use]
    pub fn new() -> Self {
        let schema = clap::Command::new("print")
            .about("Print a message")
            .arg(
                Arg::new("message")
                    .short('m')
                    .long("message")
                    .value_name("TEXT")
                    .default_value("")
                    .help("Message to print"),
            );
        Self {
            flags: Flags::new(schema),
            message: String::new(),
        }
    }

    /// Message that `run` prints
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Default for PrintCommand {
    fn default() -> Self {
        Self::new()
    }
}

/// Factory function registered under `print`
#[must_use]
pub fn create() -> Box<dyn Command> {
    Box::new(PrintCommand::new())
}

impl Command for PrintCommand {
    fn flags(&self) -> &Flags {
        &self.flags
    }

    fn parse_args<'a>(&mut self, args: &'a [String]) -> Result<&'a [String], ChainError> {
        let rest = self.flags.parse(args)?;
        self.message = self
            .flags
            .get_one::<String>("message")
            .cloned()
            .unwrap_or_default();
        Ok(rest)
    }

    fn run(&mut self, _cancel: &CancelToken) -> anyhow::Result<Option<Box<dyn Waiter>>> {
        println!("{}", self.message);
        Ok(None)
    }
}
