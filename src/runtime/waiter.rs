//! Completion handles for asynchronous command work

use std::sync::mpsc::Receiver;
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};
use tracing::{error, warn};

/// Handle for work that keeps running after a command's `run` returned
///
/// The dispatcher blocks on the handle before it counts the command as
/// finished.
pub trait Waiter: Send {
    /// Block until the work behind this handle has finished
    fn wait(self: Box<Self>);
}

/// Counting join over every launched command
///
/// `add` raises the outstanding count, `done` lowers it and `wait` blocks
/// until it is back to zero. Clones share the same counter.
#[derive(Debug, Clone, Default)]
pub struct WaitGroup {
    inner: Arc<WaitGroupInner>,
}

#[derive(Debug, Default)]
struct WaitGroupInner {
    pending: Mutex<usize>,
    zero: Condvar,
}

impl WaitGroup {
    /// Create an empty wait group
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `n` more units of outstanding work
    pub fn add(&self, n: usize) {
        let mut pending = self.lock();
        *pending = pending.saturating_add(n);
    }

    /// Release one unit of outstanding work
    pub fn done(&self) {
        let mut pending = self.lock();
        match pending.checked_sub(1) {
            Some(left) => *pending = left,
            None => {
                error!("WaitGroup::done called more times than add");
                return;
            }
        }
        if *pending == 0 {
            self.inner.zero.notify_all();
        }
    }

    /// Number of units still outstanding
    #[must_use]
    pub fn pending(&self) -> usize {
        *self.lock()
    }

    /// Block until every registered unit has been released
    pub fn wait(&self) {
        let mut pending = self.lock();
        while *pending > 0 {
            pending = self
                .inner
                .zero
                .wait(pending)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// Block until the count reaches zero or `timeout` elapses
    ///
    /// Returns `true` when the group completed in time.
    #[must_use]
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        if self.pending() == 0 {
            return true;
        }
        let Some(deadline) = Instant::now().checked_add(timeout) else {
            self.wait();
            return true;
        };
        let mut pending = self.lock();
        while *pending > 0 {
            let now = Instant::now();
            if now >= deadline {
                return false;
            }
            pending = self
                .inner
                .zero
                .wait_timeout(pending, deadline - now)
                .unwrap_or_else(PoisonError::into_inner)
                .0;
        }
        true
    }

    fn lock(&self) -> MutexGuard<'_, usize> {
        self.inner
            .pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl Waiter for WaitGroup {
    fn wait(self: Box<Self>) {
        WaitGroup::wait(&self);
    }
}

impl<T: Send> Waiter for JoinHandle<T> {
    fn wait(self: Box<Self>) {
        if (*self).join().is_err() {
            warn!("background thread panicked before completing");
        }
    }
}

/// Completes once every sender of the channel has been dropped
impl Waiter for Receiver<()> {
    fn wait(self: Box<Self>) {
        while self.recv().is_ok() {}
    }
}

/// Releases one unit of a [`WaitGroup`] when dropped
///
/// Keeps the count honest even when the guarded work panics.
#[derive(Debug)]
pub struct DoneGuard {
    group: WaitGroup,
}

impl DoneGuard {
    /// Wrap a unit that has already been added to `group`
    #[must_use]
    pub const fn new(group: WaitGroup) -> Self {
        Self { group }
    }
}

impl Drop for DoneGuard {
    fn drop(&mut self) {
        self.group.done();
    }
}
