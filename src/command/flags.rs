//! Flag schemas backed by clap
//!
//! A command only owns the flags that directly follow its name. Parsing
//! stops at the first token that is not a flag (or a flag value), which is
//! where the next command in the chain starts.

use crate::error::ChainError;
use clap::error::ErrorKind;
use clap::{Arg, ArgMatches};
use std::any::Any;

/// Flag schema and parsed values of one command instance
#[derive(Debug, Clone)]
pub struct Flags {
    schema: clap::Command,
    matches: Option<ArgMatches>,
}

impl Flags {
    /// Wrap a clap command describing this command's flags
    ///
    /// The schema name is the command's declared name.
    #[must_use]
    pub fn new(schema: clap::Command) -> Self {
        let mut schema = schema.no_binary_name(true).disable_version_flag(true);
        schema.build();
        Self {
            schema,
            matches: None,
        }
    }

    /// Declared command name
    #[must_use]
    #[inline]
    pub fn name(&self) -> &str {
        self.schema.get_name()
    }

    /// Help text for this command's flags
    #[must_use]
    pub fn render_help(&self) -> String {
        self.schema.clone().render_help().to_string()
    }

    /// Parse the leading flags of `args` and return the unconsumed rest
    ///
    /// # Errors
    ///
    /// Returns [`ChainError::Parse`] if clap rejects the flags and
    /// [`ChainError::HelpRequested`] if they ask for help.
    pub fn parse<'a>(&mut self, args: &'a [String]) -> Result<&'a [String], ChainError> {
        let prefix = flag_prefix(&self.schema, args);
        let matches = self
            .schema
            .try_get_matches_from_mut(&args[..prefix.flags_end])
            .map_err(|err| self.map_clap_error(&err))?;
        self.matches = Some(matches);
        Ok(&args[prefix.consumed..])
    }

    /// Matches from the last successful [`Flags::parse`]
    #[must_use]
    #[inline]
    pub const fn matches(&self) -> Option<&ArgMatches> {
        self.matches.as_ref()
    }

    /// Typed value of a flag, if it was given or has a default
    #[must_use]
    pub fn get_one<T: Any + Clone + Send + Sync + 'static>(&self, id: &str) -> Option<&T> {
        self.matches
            .as_ref()
            .and_then(|matches| matches.try_get_one::<T>(id).ok().flatten())
    }

    /// Value of a boolean switch, `false` when unset or undeclared
    #[must_use]
    pub fn get_flag(&self, id: &str) -> bool {
        self.get_one::<bool>(id).copied().unwrap_or(false)
    }

    fn map_clap_error(&self, err: &clap::Error) -> ChainError {
        let command = self.name().to_owned();
        match err.kind() {
            ErrorKind::DisplayHelp
            | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
            | ErrorKind::DisplayVersion => ChainError::HelpRequested {
                command,
                text: err.render().to_string(),
            },
            _ => ChainError::parse(command, summarize(&err.render().to_string())),
        }
    }
}

/// Where a command's flags end within an argument list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct FlagPrefix {
    /// Tokens handed to clap
    flags_end: usize,
    /// Tokens owned by the command, including a trailing `--`
    consumed: usize,
}

fn flag_prefix(schema: &clap::Command, args: &[String]) -> FlagPrefix {
    let mut index = 0;
    while let Some(token) = args.get(index) {
        if token == "--" {
            return FlagPrefix {
                flags_end: index,
                consumed: index + 1,
            };
        }
        if token == "-" || !token.starts_with('-') {
            break;
        }

        let width = if let Some(long) = token.strip_prefix("--") {
            if long.contains('=') {
                1
            } else {
                find_long(schema, long).map_or(1, value_width)
            }
        } else {
            short_cluster_width(schema, &token[1..])
        };
        index = (index + width).min(args.len());
    }

    FlagPrefix {
        flags_end: index,
        consumed: index,
    }
}

fn short_cluster_width(schema: &clap::Command, cluster: &str) -> usize {
    let mut chars = cluster.chars();
    while let Some(short) = chars.next() {
        match find_short(schema, short) {
            Some(arg) if takes_value(arg) => {
                // "-oVALUE" or "-o=VALUE" carry their value inline
                return if chars.as_str().is_empty() { 2 } else { 1 };
            }
            Some(_) => {}
            None => return 1,
        }
    }
    1
}

fn find_long<'s>(schema: &'s clap::Command, name: &str) -> Option<&'s Arg> {
    schema.get_arguments().find(|arg| {
        arg.get_long_and_visible_aliases()
            .is_some_and(|names| names.contains(&name))
    })
}

fn find_short(schema: &clap::Command, short: char) -> Option<&Arg> {
    schema.get_arguments().find(|arg| {
        arg.get_short_and_visible_aliases()
            .is_some_and(|shorts| shorts.contains(&short))
    })
}

fn takes_value(arg: &Arg) -> bool {
    arg.get_action().takes_values()
}

fn value_width(arg: &Arg) -> usize {
    if takes_value(arg) { 2 } else { 1 }
}

/// First line of a rendered clap error without its `error:` prefix
fn summarize(rendered: &str) -> String {
    let line = rendered.lines().next().unwrap_or_default();
    line.strip_prefix("error: ").unwrap_or(line).to_owned()
}
