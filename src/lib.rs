//! `cmdchain` - run several chained sub-commands from one command line
//!
//! A single invocation can name several commands, each followed by its own
//! options:
//!
//! ```sh
//! cmdchain print --message starting sleep --millis 500 --message done
//! ```
//!
//! Commands are looked up by name in a [`Registry`]. Each one consumes the
//! options that belong to it and is launched on its own thread while the
//! rest of the line is still being parsed. The returned [`WaitGroup`]
//! completes once every launched command has finished.

pub mod cli;
pub mod command;
pub mod commands;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod runtime;
pub mod system;

use anyhow::Result;
use clap::CommandFactory as _;
use cli::{Args, PROGRAM};
use config::Config;
use dispatch::{Dispatcher, render_usage};
use error::ChainError;
use system::System;
use tracing::debug;

pub use command::{Command, CommandFactory, Flags};
pub use dispatch::{ParseErrorPolicy, Registry};
pub use runtime::{CancelToken, WaitGroup, Waiter};

/// Dispatch the process arguments of `system` against `registry`
///
/// The program name is skipped and every remaining argument belongs to the
/// command chain. `defaults` is used when there are no arguments.
///
/// # Errors
///
/// See [`Dispatcher::dispatch`].
pub fn dispatch_from_system(
    system: &dyn System,
    registry: &Registry,
    defaults: &[String],
    cancel: &CancelToken,
) -> Result<WaitGroup, ChainError> {
    let argv = system.args();
    let args = argv.get(1..).unwrap_or_default();
    Dispatcher::new(registry).dispatch(args, defaults, cancel)
}

/// Load the configuration named by `--config`, or the defaults
pub fn load_config(args: &Args, system: &dyn System) -> Result<Config> {
    match args.config.as_deref() {
        Some(path) => Config::load_from_file(system, path),
        None => Ok(Config::default()),
    }
}

/// Main entry point for the cmdchain library
///
/// Launches the command chain from `args` (or the configured defaults) and
/// waits for all of it to finish. Prints the usage when there is nothing to
/// run.
pub fn run(args: &Args, config: &Config, registry: &Registry) -> Result<()> {
    config.validate(registry)?;

    if args.commands.is_empty() && config.default_commands.is_empty() {
        print!("{}", render_usage(PROGRAM, &Args::command(), registry));
        return Ok(());
    }

    let cancel = CancelToken::new();
    let group = Dispatcher::new(registry)
        .with_parse_errors(config.parse_errors)
        .dispatch(&args.commands, &config.default_commands, &cancel)?;

    debug!(pending = group.pending(), "waiting for commands");
    group.wait();
    Ok(())
}
