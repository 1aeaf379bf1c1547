//! Command factories

use super::Command;

/// Creates a fresh [`Command`] for every dispatch
///
/// Implemented by dedicated types and by any plain function or closure
/// returning a boxed command, so both styles register the same way.
pub trait CommandFactory: Send + Sync {
    /// Create a new, independent command instance
    fn create(&self) -> Box<dyn Command>;
}

impl<F> CommandFactory for F
where
    F: Fn() -> Box<dyn Command> + Send + Sync,
{
    #[inline]
    fn create(&self) -> Box<dyn Command> {
        self()
    }
}
