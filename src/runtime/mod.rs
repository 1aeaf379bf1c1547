//! Runtime primitives
//!
//! Completion handles shared between the dispatcher and launched commands,
//! and the cancellation context threaded through every execution

pub mod cancel;
pub mod waiter;

pub use cancel::*;
pub use waiter::*;
