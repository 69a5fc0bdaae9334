//! Cooperative interruption.
//!
//! Rust threads cannot be interrupted from outside, so the pool hands every
//! worker a [`CancelToken`] and installs it as the "current" token while the
//! worker runs. Task code polls it through [`is_interrupted`], [`check`] or
//! sleeps through [`sleep`], which wakes up as soon as the token fires.

use std::cell::RefCell;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, Mutex};
use std::time::{Duration, Instant};

use crate::error::Interrupted;

/// Flag shared between whoever requests the stop and whoever honours it.
#[derive(Debug, Default)]
pub struct CancelToken {
    flag: AtomicBool,
    lock: Mutex<()>,
    wakeup: Condvar,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Release);
        // Taking the lock orders the store before any sleeper re-checks the flag.
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());
        self.wakeup.notify_all();
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }

    /// Sleep for `duration` unless the token fires first.
    ///
    /// A duration too large to add to `Instant::now()` sleeps until cancelled.
    pub fn sleep(&self, duration: Duration) -> Result<(), Interrupted> {
        let deadline = Instant::now().checked_add(duration);
        let mut guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());
        loop {
            if self.is_cancelled() {
                return Err(Interrupted);
            }
            guard = match deadline {
                Some(deadline) => {
                    let now = Instant::now();
                    if now >= deadline {
                        return Ok(());
                    }
                    self.wakeup
                        .wait_timeout(guard, deadline - now)
                        .unwrap_or_else(|e| e.into_inner())
                        .0
                }
                None => self.wakeup.wait(guard).unwrap_or_else(|e| e.into_inner()),
            };
        }
    }
}

thread_local! {
    static CURRENT: RefCell<Option<Arc<CancelToken>>> = const { RefCell::new(None) };
}

/// Installs `token` as the current thread's token until the guard drops.
pub(crate) fn install(token: Arc<CancelToken>) -> InstallGuard {
    let previous = CURRENT.with(|cell| cell.borrow_mut().replace(token));
    InstallGuard { previous }
}

pub(crate) struct InstallGuard {
    previous: Option<Arc<CancelToken>>,
}

impl Drop for InstallGuard {
    fn drop(&mut self) {
        let previous = self.previous.take();
        CURRENT.with(|cell| *cell.borrow_mut() = previous);
    }
}

/// The token of the worker running on this thread, if any.
pub fn current() -> Option<Arc<CancelToken>> {
    CURRENT.with(|cell| cell.borrow().clone())
}

/// `true` once the pool running this thread was forcibly shut down.
/// Always `false` outside a pool worker.
pub fn is_interrupted() -> bool {
    CURRENT.with(|cell| cell.borrow().as_ref().is_some_and(|t| t.is_cancelled()))
}

pub fn check() -> Result<(), Interrupted> {
    if is_interrupted() {
        Err(Interrupted)
    } else {
        Ok(())
    }
}

/// Interruptible replacement for `thread::sleep` inside tasks.
pub fn sleep(duration: Duration) -> Result<(), Interrupted> {
    match current() {
        Some(token) => token.sleep(duration),
        None => {
            std::thread::sleep(duration);
            Ok(())
        }
    }
}
