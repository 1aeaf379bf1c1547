//! The dispatch loop

use crate::command::Command;
use crate::dispatch::Registry;
use crate::error::ChainError;
use crate::runtime::{CancelToken, DoneGuard, WaitGroup};
use serde::{Deserialize, Serialize};
use std::thread;
use tracing::{debug, error, warn};

/// What the dispatcher does when a command rejects its arguments
///
/// Either way no later command is dispatched, since the failing command
/// could not say where its arguments end.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParseErrorPolicy {
    /// Cancel the run and report the error to the caller
    #[default]
    Abort,
    /// Log a warning and let already launched commands finish
    Skip,
}

/// Resolves commands from an argument list and launches them
#[derive(Debug, Clone, Copy)]
pub struct Dispatcher<'r> {
    registry: &'r Registry,
    parse_errors: ParseErrorPolicy,
}

impl<'r> Dispatcher<'r> {
    /// Create a dispatcher over `registry` with the default parse policy
    #[must_use]
    pub const fn new(registry: &'r Registry) -> Self {
        Self {
            registry,
            parse_errors: ParseErrorPolicy::Abort,
        }
    }

    /// Set the policy applied to argument parse errors
    #[must_use]
    pub const fn with_parse_errors(mut self, policy: ParseErrorPolicy) -> Self {
        self.parse_errors = policy;
        self
    }

    /// Split `args` into commands and launch each of them concurrently
    ///
    /// `defaults` replaces `args` only when `args` is empty. Every command
    /// receives a clone of `cancel`. The returned group completes once every
    /// launched command, and any waiter it returned, has finished.
    ///
    /// # Errors
    ///
    /// - [`ChainError::UnknownCommand`] if a token in command position is not
    ///   registered
    /// - [`ChainError::Parse`] if a command rejects its arguments and the
    ///   policy is [`ParseErrorPolicy::Abort`]
    /// - [`ChainError::HelpRequested`] if a command was asked for its help
    ///
    /// `cancel` is cancelled before any of these is returned, so commands
    /// launched earlier in the run can stop.
    pub fn dispatch(
        &self,
        args: &[String],
        defaults: &[String],
        cancel: &CancelToken,
    ) -> Result<WaitGroup, ChainError> {
        let group = WaitGroup::new();
        let mut remaining = if args.is_empty() {
            debug!(defaults = ?defaults, "no commands given, using defaults");
            defaults
        } else {
            args
        };

        while let Some((name, rest)) = remaining.split_first() {
            let Some(factory) = self.registry.lookup(name) else {
                cancel.cancel();
                return Err(ChainError::unknown_command(name.as_str()));
            };

            let mut command = factory.create();
            match consume(command.as_mut(), rest) {
                Ok(next) => remaining = next,
                Err(err @ ChainError::HelpRequested { .. }) => {
                    cancel.cancel();
                    return Err(err);
                }
                Err(err) => match self.parse_errors {
                    ParseErrorPolicy::Abort => {
                        cancel.cancel();
                        return Err(err);
                    }
                    ParseErrorPolicy::Skip => {
                        warn!(command = %name, "{err}; not dispatching it or anything after it");
                        break;
                    }
                },
            }

            launch(command, &group, cancel);
        }

        Ok(group)
    }
}

/// Let `command` parse its arguments and check it handed back a suffix
fn consume<'a>(command: &mut dyn Command, args: &'a [String]) -> Result<&'a [String], ChainError> {
    let rest = command.parse_args(args)?;
    if is_suffix(args, rest) {
        Ok(rest)
    } else {
        Err(ChainError::parse(
            command.name(),
            "remaining arguments are not a suffix of the arguments it was given",
        ))
    }
}

fn is_suffix(args: &[String], rest: &[String]) -> bool {
    rest.is_empty()
        || (rest.len() <= args.len() && args.as_ptr_range().end == rest.as_ptr_range().end)
}

fn launch(command: Box<dyn Command>, group: &WaitGroup, cancel: &CancelToken) {
    let name = command.name().to_owned();
    group.add(1);
    // Dropped with the closure, so the unit is released even if the thread
    // never starts or the command panics.
    let guard = DoneGuard::new(group.clone());
    let cancel = cancel.clone();

    debug!(command = %name, "launching");
    let spawned = thread::Builder::new()
        .name(format!("cmd-{name}"))
        .spawn(move || {
            let _guard = guard;
            let mut command = command;
            execute(command.as_mut(), &cancel);
        });

    if let Err(err) = spawned {
        error!(
            command = %name,
            "{}",
            ChainError::runtime(&name, format!("failed to start thread: {err}"))
        );
    }
}

fn execute(command: &mut dyn Command, cancel: &CancelToken) {
    let name = command.name().to_owned();
    match command.run(cancel) {
        Ok(Some(waiter)) => {
            debug!(command = %name, "waiting for background work");
            waiter.wait();
        }
        Ok(None) => {}
        Err(err) => {
            error!(command = %name, "{}", ChainError::runtime(&name, format!("{err:#}")));
        }
    }
    debug!(command = %name, "finished");
}
