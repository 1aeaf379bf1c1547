//! Built-in commands
//!
//! `print` registers as a plain function, `sleep` through a dedicated
//! factory type; `fail` exercises the runtime error path.

pub mod fail;
pub mod print;
pub mod sleep;

pub use fail::FailCommand;
pub use print::PrintCommand;
pub use sleep::{SleepCommand, SleepFactory};

use crate::dispatch::Registry;
use std::time::Duration;

/// Default duration of `sleep` when `--millis` is not given
pub const DEFAULT_SLEEP: Duration = Duration::from_millis(1000);

/// Register every built-in command
pub fn register_builtins(registry: &mut Registry) {
    registry.register("print", print::create);
    registry.register("sleep", SleepFactory::new(DEFAULT_SLEEP));
    registry.register("fail", fail::create);
}

/// Registry holding only the built-in commands
#[must_use]
pub fn builtin_registry() -> Registry {
    let mut registry = Registry::new();
    register_builtins(&mut registry);
    registry
}
