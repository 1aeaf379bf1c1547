//! YAML configuration loading and parsing

use crate::config::Config;
use crate::error::ChainError;
use crate::system::System;
use anyhow::{Context as _, Result};
use serde_json::Value;
use std::path::Path;
use tracing::debug;

/// Load and parse YAML configuration from file
pub fn load_config(system: &dyn System, path: &str) -> Result<Config> {
    let path_obj = Path::new(path);

    if !system.exists(path_obj).unwrap_or(false) {
        return Err(ChainError::configuration(format!(
            "Configuration file not found: {path}"
        ))
        .into());
    }

    let content = system
        .read_to_string(path_obj)
        .map_err(|e| ChainError::configuration(format!("Failed to read {path}: {e}")))?;

    let config = parse_config(&content)
        .with_context(|| format!("Invalid configuration file: {path}"))?;
    debug!(path, ?config, "loaded configuration");
    Ok(config)
}

/// Parse configuration text and validate it against the schema
pub fn parse_config(content: &str) -> Result<Config> {
    // An empty document is an empty configuration
    let raw: Value = serde_yaml::from_str::<Option<Value>>(content)
        .map_err(|e| ChainError::configuration(format!("Failed to parse YAML: {e}")))?
        .unwrap_or_else(|| Value::Object(serde_json::Map::new()));

    crate::config::schema::validate_against_schema(&raw)
        .map_err(|e| ChainError::configuration(format!("{e:#}")))?;

    serde_json::from_value(raw)
        .map_err(|e| ChainError::configuration(format!("Invalid configuration: {e}")).into())
}
