//! System abstraction for the process environment
//!
//! Command-line arguments and file reads go through this trait so the CLI
//! entry point and configuration loading can be tested in isolation.

use std::io;
use std::path::Path;

pub mod mock;
pub mod real;

pub use mock::MockSystem;
pub use real::RealSystem;

/// Unified trait for the system interactions of a run
///
/// # Implementations
/// - `RealSystem`: Production implementation using `std::env` and `std::fs`
/// - `MockSystem`: Test implementation using in-memory storage
pub trait System: Send + Sync {
    /// Process arguments, starting with the program name
    fn args(&self) -> Vec<String>;

    /// Read entire file contents as a string
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Check if a path exists
    fn exists(&self, path: &Path) -> io::Result<bool>;
}
