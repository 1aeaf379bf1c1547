//! Configuration validation logic

use crate::config::Config;
use crate::dispatch::Registry;
use crate::error::ChainError;
use anyhow::Result;

/// Validate a configuration against the registered commands
///
/// # Errors
///
/// Returns an error if:
/// - A default command token is empty
/// - The first default token is not a registered command
#[inline]
pub fn validate_config(config: &Config, registry: &Registry) -> Result<()> {
    if let Some(index) = config
        .default_commands
        .iter()
        .position(|token| token.trim().is_empty())
    {
        return Err(ChainError::configuration(format!(
            "default_commands: token #{} is empty",
            index + 1
        ))
        .into());
    }

    if let Some(first) = config.default_commands.first() {
        if !registry.contains(first) {
            return Err(ChainError::configuration(format!(
                "default_commands: '{first}' is not a registered command (available: {})",
                registry.names().join(", ")
            ))
            .into());
        }
    }

    Ok(())
}
