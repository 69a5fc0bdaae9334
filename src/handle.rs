//! Task handles: the future half of a submission.
//!
//! A handle is a write-once/read-many cell. The pool keeps the writing side
//! (a [`Completer`]) inside the queued job; callers keep any number of
//! [`TaskHandle`] clones and block on them with [`TaskHandle::wait`].

use std::fmt;
use std::sync::{Arc, Condvar, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use crate::error::PoolError;

/// Identity of a submitted task, assigned in submission order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TaskId(pub(crate) u64);

impl TaskId {
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "task-{}", self.0)
    }
}

struct ResultCell<T> {
    outcome: Mutex<Option<Result<T, PoolError>>>,
    resolved: Condvar,
}

impl<T> ResultCell<T> {
    fn lock(&self) -> MutexGuard<'_, Option<Result<T, PoolError>>> {
        // A reader never panics while holding the lock, but stay usable if one did.
        self.outcome.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Creates a connected completer/handle pair for a new task.
pub(crate) fn pair<T>(id: TaskId) -> (Completer<T>, TaskHandle<T>) {
    let cell = Arc::new(ResultCell {
        outcome: Mutex::new(None),
        resolved: Condvar::new(),
    });
    (
        Completer {
            cell: Some(Arc::clone(&cell)),
        },
        TaskHandle { id, cell },
    )
}

// =============================================================================
// Writer side
// =============================================================================

/// Resolves a handle exactly once. Dropping an unused completer resolves the
/// handle with [`PoolError::TaskDiscarded`] so no reader waits forever.
pub(crate) struct Completer<T> {
    cell: Option<Arc<ResultCell<T>>>,
}

impl<T> Completer<T> {
    pub(crate) fn complete(mut self, outcome: Result<T, PoolError>) {
        if let Some(cell) = self.cell.take() {
            resolve(&cell, outcome);
        }
    }
}

impl<T> Drop for Completer<T> {
    fn drop(&mut self) {
        if let Some(cell) = self.cell.take() {
            resolve(&cell, Err(PoolError::TaskDiscarded));
        }
    }
}

fn resolve<T>(cell: &ResultCell<T>, outcome: Result<T, PoolError>) {
    let mut slot = cell.lock();
    if slot.is_none() {
        *slot = Some(outcome);
        cell.resolved.notify_all();
    }
}

// =============================================================================
// Reader side
// =============================================================================

/// The eventual result of a submitted task.
pub struct TaskHandle<T> {
    id: TaskId,
    cell: Arc<ResultCell<T>>,
}

impl<T> Clone for TaskHandle<T> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            cell: Arc::clone(&self.cell),
        }
    }
}

impl<T> fmt::Debug for TaskHandle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskHandle")
            .field("id", &self.id)
            .field("done", &self.is_done())
            .finish()
    }
}

impl<T> TaskHandle<T> {
    pub fn id(&self) -> TaskId {
        self.id
    }

    pub fn is_done(&self) -> bool {
        self.cell.lock().is_some()
    }
}

impl<T: Clone> TaskHandle<T> {
    /// Blocks until the task has an outcome and returns a copy of it.
    ///
    /// Every caller, on any thread, sees the same value or the same
    /// `TaskFailed` cause; the task itself only ever runs once.
    pub fn wait(&self) -> Result<T, PoolError> {
        let mut slot = self.cell.lock();
        loop {
            if let Some(outcome) = slot.as_ref() {
                return outcome.clone();
            }
            slot = self
                .cell
                .resolved
                .wait(slot)
                .unwrap_or_else(|e| e.into_inner());
        }
    }

    /// Like [`wait`](Self::wait) but gives up after `timeout`.
    ///
    /// Timing out does not cancel the task; the handle can be waited on again.
    pub fn wait_timeout(&self, timeout: Duration) -> Result<T, PoolError> {
        let start = Instant::now();
        let mut slot = self.cell.lock();
        loop {
            if let Some(outcome) = slot.as_ref() {
                return outcome.clone();
            }
            let waited = start.elapsed();
            if waited >= timeout {
                return Err(PoolError::AwaitTimeout { waited });
            }
            slot = self
                .cell
                .resolved
                .wait_timeout(slot, timeout - waited)
                .unwrap_or_else(|e| e.into_inner())
                .0;
        }
    }

    /// Non-blocking peek.
    pub fn try_get(&self) -> Option<Result<T, PoolError>> {
        (*self.cell.lock()).clone()
    }
}
