//! `sleep` - wait in the background, optionally printing when done

use crate::command::{Command, CommandFactory, Flags};
use crate::error::ChainError;
use crate::runtime::{CancelToken, Waiter};
use anyhow::Context as _;
use clap::{Arg, value_parser};
use std::thread;
use std::time::Duration;
use tracing::debug;

/// Waits for `--millis` on a background thread
///
/// `run` returns immediately with a waiter for the background thread. The
/// wait ends early when the run is cancelled.
#[derive(Debug, Clone)]
pub struct SleepCommand {
    flags: Flags,
    duration: Duration,
    message: Option<String>,
}

impl SleepCommand {
    /// Create a `sleep` command that waits `default` unless told otherwise
    #[must_use]
    pub fn new(default: Duration) -> Self {
        let default_millis = u64::try_from(default.as_millis()).unwrap_or(u64::MAX);
        let schema = clap::Command::new("sleep")
            .about("Wait in the background")
            .arg(
                Arg::new("millis")
                    .short('d')
                    .long("millis")
                    .value_name("MS")
                    .value_parser(value_parser!(u64))
                    .help(format!("How long to wait, in milliseconds [default: {default_millis}]")),
            )
            .arg(
                Arg::new("message")
                    .short('m')
                    .long("message")
                    .value_name("TEXT")
                    .help("Printed once the wait is over"),
            );
        Self {
            flags: Flags::new(schema),
            duration: default,
            message: None,
        }
    }

    /// How long `run` waits
    #[must_use]
    pub const fn duration(&self) -> Duration {
        self.duration
    }
}

impl Command for SleepCommand {
    fn flags(&self) -> &Flags {
        &self.flags
    }

    fn parse_args<'a>(&mut self, args: &'a [String]) -> Result<&'a [String], ChainError> {
        let rest = self.flags.parse(args)?;
        if let Some(millis) = self.flags.get_one::<u64>("millis") {
            self.duration = Duration::from_millis(*millis);
        }
        self.message = self.flags.get_one::<String>("message").cloned();
        Ok(rest)
    }

    fn run(&mut self, cancel: &CancelToken) -> anyhow::Result<Option<Box<dyn Waiter>>> {
        let cancel = cancel.clone();
        let duration = self.duration;
        let message = self.message.clone();
        let handle = thread::Builder::new()
            .name("sleep".to_owned())
            .spawn(move || {
                if cancel.wait_timeout(duration) {
                    debug!("sleep cancelled");
                    return;
                }
                if let Some(message) = message {
                    println!("{message}");
                }
            })
            .context("failed to start sleep thread")?;
        Ok(Some(Box::new(handle)))
    }
}

/// Factory for [`SleepCommand`] carrying the default duration
#[derive(Debug, Clone, Copy)]
pub struct SleepFactory {
    default: Duration,
}

impl SleepFactory {
    /// Create a factory whose commands wait `default` unless told otherwise
    #[must_use]
    pub const fn new(default: Duration) -> Self {
        Self { default }
    }
}

impl CommandFactory for SleepFactory {
    fn create(&self) -> Box<dyn Command> {
        Box::new(SleepCommand::new(self.default))
    }
}
