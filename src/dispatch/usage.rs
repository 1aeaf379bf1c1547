//! Usage text covering the global options and every registered command

use crate::dispatch::Registry;
use std::fmt::Write as _;

/// Synopsis line for a program that accepts chained commands
#[must_use]
pub fn synopsis(program: &str) -> String {
    format!("{program} [global_options] [command [command_options]]...")
}

/// Help for every registered command, sorted by name
///
/// Each entry is rendered from a fresh instance created by the command's
/// factory.
#[must_use]
pub fn render_commands(registry: &Registry) -> String {
    let mut out = String::from("Commands:\n");
    for name in registry.names() {
        let Some(factory) = registry.lookup(name) else {
            continue;
        };
        let command = factory.create();
        let help = command.flags().render_help();
        let _ = writeln!(out);
        if command.name() != name {
            // Registered under a different name than the schema declares
            let _ = writeln!(out, "{name}:");
        }
        let _ = writeln!(out, "{}", help.trim_end());
    }
    out
}

/// Full usage text: synopsis, global options, then all commands
#[must_use]
pub fn render_usage(program: &str, globals: &clap::Command, registry: &Registry) -> String {
    let mut out = format!("Usage of {program}:\n{}\n\n", synopsis(program));
    let mut globals = globals.clone();
    let _ = writeln!(out, "{}", globals.render_help().to_string().trim_end());
    let _ = writeln!(out);
    out.push_str(&render_commands(registry));
    out
}
