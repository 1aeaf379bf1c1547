//! `fail` - a command whose run always fails

use crate::command::{Command, Flags};
use crate::error::ChainError;
use crate::runtime::{CancelToken, Waiter};
use anyhow::bail;
use clap::Arg;

/// Fails in `run` with `--reason`
#[derive(Debug, Clone)]
pub struct FailCommand {
    flags: Flags,
    reason: String,
}

/// Factory function registered under `fail`
#[must_use]
pub fn create() -> Box<dyn Command> {
    let schema = clap::Command::new("fail")
        .about("Fail when run; other commands keep running")
        .arg(
            Arg::new("reason")
                .long("reason")
                .value_name("TEXT")
                .default_value("failed on purpose")
                .help("Error reported for this command"),
        );
    Box::new(FailCommand {
        flags: Flags::new(schema),
        reason: String::new(),
    })
}

impl Command for FailCommand {
    fn flags(&self) -> &Flags {
        &self.flags
    }

    fn parse_args<'a>(&mut self, args: &'a [String]) -> Result<&'a [String], ChainError> {
        let rest = self.flags.parse(args)?;
        self.reason = self
            .flags
            .get_one::<String>("reason")
            .cloned()
            .unwrap_or_default();
        Ok(rest)
    }

    fn run(&mut self, _cancel: &CancelToken) -> anyhow::Result<Option<Box<dyn Waiter>>> {
        bail!("{}", self.reason)
    }
}
