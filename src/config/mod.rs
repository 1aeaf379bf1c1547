//! Configuration management module
//!
//! Handles YAML configuration parsing, JSON schema validation and semantic
//! checks against the command registry

pub mod schema;
pub mod validation;
pub mod yaml;

use crate::dispatch::{ParseErrorPolicy, Registry};
use crate::system::System;
use serde::{Deserialize, Serialize};

/// Run configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Command line used when the invocation names no command
    pub default_commands: Vec<String>,

    /// Policy for commands that reject their arguments
    pub parse_errors: ParseErrorPolicy,

    /// Log filter used when `RUST_LOG` is not set
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,
}

impl Config {
    /// Load configuration from file
    pub fn load_from_file(system: &dyn System, path: &str) -> anyhow::Result<Self> {
        yaml::load_config(system, path)
    }

    /// Check the configuration against the registered commands
    pub fn validate(&self, registry: &Registry) -> anyhow::Result<()> {
        validation::validate_config(self, registry)
    }
}
