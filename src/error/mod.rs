//! Error handling module
//! 
//! Defines the dispatcher error type and its exit codes

pub mod types;

pub use types::*;
