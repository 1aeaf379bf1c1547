//! Custom error types with exit codes

use thiserror::Error;

/// Main error type for command dispatch
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ChainError {
    /// Configuration Error - missing or invalid configuration
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Unknown Command - the token is not a registered command name
    #[error("unknown command: {name}")]
    UnknownCommand { name: String },

    /// Parse Error - a command rejected its own arguments
    #[error("Invalid arguments for {command}: {message}")]
    Parse { command: String, message: String },

    /// Help Requested - a command was asked for its help text
    #[error("{text}")]
    HelpRequested { command: String, text: String },

    /// Runtime Error - a command failed to start or to run
    ///
    /// Only ever logged by the dispatcher; it never ends the process, so its
    /// exit code is not observable from the binary.
    #[error("Error on {command}: {message}")]
    Runtime { command: String, message: String },
}

impl ChainError {
    /// Get the appropriate exit code for this error type
    #[must_use]
    #[inline]
    pub const fn exit_code(&self) -> i32 {
        match *self {
            Self::HelpRequested { .. } => 0,
            Self::Configuration { .. } => 1,
            Self::UnknownCommand { .. } => 2,
            Self::Parse { .. } => 3,
            Self::Runtime { .. } => 4,
        }
    }

    /// Create a configuration error
    #[inline]
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create an unknown command error
    #[inline]
    pub fn unknown_command<S: Into<String>>(name: S) -> Self {
        Self::UnknownCommand { name: name.into() }
    }

    /// Create a parse error for the named command
    #[inline]
    pub fn parse<C: Into<String>, S: Into<String>>(command: C, message: S) -> Self {
        Self::Parse {
            command: command.into(),
            message: message.into(),
        }
    }

    /// Create a runtime error for the named command
    #[inline]
    pub fn runtime<C: Into<String>, S: Into<String>>(command: C, message: S) -> Self {
        Self::Runtime {
            command: command.into(),
            message: message.into(),
        }
    }
}
