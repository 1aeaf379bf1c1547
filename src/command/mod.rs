//! Command contract
//!
//! A command declares its flags, consumes the leading arguments that belong
//! to it and then runs. Factories create one fresh command per dispatch.

pub mod factory;
pub mod flags;

pub use factory::*;
pub use flags::*;

use crate::error::ChainError;
use crate::runtime::{CancelToken, Waiter};

/// A unit of work selected by name on the command line
pub trait Command: Send {
    /// Flag schema of this command, used for help and diagnostics
    fn flags(&self) -> &Flags;

    /// Declared name of this command
    fn name(&self) -> &str {
        self.flags().name()
    }

    /// Consume the leading arguments that belong to this command
    ///
    /// Returns the arguments left for the commands that follow. The returned
    /// slice must be a suffix of `args`.
    ///
    /// # Errors
    ///
    /// Returns a [`ChainError::Parse`] when the arguments do not match the
    /// command's flags, or [`ChainError::HelpRequested`] for `--help`.
    fn parse_args<'a>(&mut self, args: &'a [String]) -> Result<&'a [String], ChainError>;

    /// Start the command's work
    ///
    /// Returns a [`Waiter`] when the work continues after this call returns
    /// and `None` when it is already complete.
    ///
    /// # Errors
    ///
    /// Returns an error if the work could not be started or failed while
    /// running synchronously.
    fn run(&mut self, cancel: &CancelToken) -> anyhow::Result<Option<Box<dyn Waiter>>>;
}
