//! Real system implementation using `std::env` and `std::fs`

use super::System;
use std::fs;
use std::io;
use std::path::Path;

/// Production implementation of System trait
///
/// Delegates directly to the standard library.
#[derive(Debug, Clone, Copy)]
pub struct RealSystem;

impl RealSystem {
    /// Create a new `RealSystem` instance
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Default for RealSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System for RealSystem {
    fn args(&self) -> Vec<String> {
        std::env::args().collect()
    }

    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        fs::read_to_string(path)
    }

    fn exists(&self, path: &Path) -> io::Result<bool> {
        path.try_exists()
    }
}
