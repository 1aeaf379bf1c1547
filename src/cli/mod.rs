//! Command-line interface module
//! 
//! Global options and the help text listing every registered command

pub mod args;

pub use args::*;
