//! Command registry and the dispatch loop
//!
//! Splits one argument list into a chain of commands and launches each of
//! them concurrently

pub mod dispatcher;
pub mod registry;
pub mod usage;

pub use dispatcher::*;
pub use registry::*;
pub use usage::*;
