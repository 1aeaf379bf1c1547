//! Cancellation context shared by every launched command

use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

/// Cooperative cancellation signal
///
/// All clones observe the same state. Cancelling is one-way; commands poll
/// [`CancelToken::is_cancelled`] or block in [`CancelToken::wait_timeout`].
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    inner: Arc<CancelInner>,
}

#[derive(Debug, Default)]
struct CancelInner {
    cancelled: Mutex<bool>,
    signal: Condvar,
}

impl CancelToken {
    /// Create a token that is not cancelled
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Signal cancellation to every holder of this token
    pub fn cancel(&self) {
        let mut cancelled = self.lock();
        if !*cancelled {
            *cancelled = true;
            self.inner.signal.notify_all();
        }
    }

    /// Whether [`CancelToken::cancel`] has been called
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        *self.lock()
    }

    /// Block until the token is cancelled
    pub fn wait(&self) {
        let mut cancelled = self.lock();
        while !*cancelled {
            cancelled = self
                .inner
                .signal
                .wait(cancelled)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// Block until the token is cancelled or `timeout` elapses
    ///
    /// Returns `true` if the token was cancelled.
    #[must_use]
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        if self.is_cancelled() {
            return true;
        }
        // Too far out to represent: no different from waiting forever.
        let Some(deadline) = Instant::now().checked_add(timeout) else {
            self.wait();
            return true;
        };
        let mut cancelled = self.lock();
        while !*cancelled {
            let now = Instant::now();
            if now >= deadline {
                return false;
            }
            cancelled = self
                .inner
                .signal
                .wait_timeout(cancelled, deadline - now)
                .unwrap_or_else(PoisonError::into_inner)
                .0;
        }
        true
    }

    fn lock(&self) -> MutexGuard<'_, bool> {
        self.inner
            .cancelled
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
