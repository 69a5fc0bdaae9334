//! The worker loop.
//!
//! Each worker is a named OS thread cycling `Idle -> Running -> Idle` until
//! the pool stops accepting work and the queue is empty, or until its cancel
//! token fires. It only ever looks at the stop condition between tasks.

use std::fmt;
use std::sync::Arc;
use std::thread;

use tracing::{debug, trace};

use super::{PoolState, Shared};
use crate::interrupt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    Idle,
    Running,
    Stopped,
}

impl fmt::Display for WorkerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WorkerState::Idle => "idle",
            WorkerState::Running => "running",
            WorkerState::Stopped => "stopped",
        };
        f.write_str(name)
    }
}

pub(crate) fn run(shared: Arc<Shared>, index: usize) {
    let token = Arc::clone(&shared.tokens[index]);
    let _installed = interrupt::install(Arc::clone(&token));
    let name = thread::current().name().unwrap_or("worker").to_string();
    debug!(worker = %name, "worker started");

    loop {
        let job = {
            let mut inner = shared.lock();
            loop {
                if token.is_cancelled() {
                    break None;
                }
                if let Some(job) = inner.queue.pop() {
                    inner.workers[index] = WorkerState::Running;
                    inner.active += 1;
                    break Some(job);
                }
                if inner.state != PoolState::Accepting {
                    break None;
                }
                inner = shared
                    .work_available
                    .wait(inner)
                    .unwrap_or_else(|e| e.into_inner());
            }
        };

        let Some(job) = job else { break };
        let id = job.id();
        trace!(worker = %name, task = %id, "task dequeued");
        job.run();
        debug!(worker = %name, task = %id, "task finished");

        let mut inner = shared.lock();
        inner.workers[index] = WorkerState::Idle;
        inner.active -= 1;
        inner.completed += 1;
        if inner.state != PoolState::Accepting {
            shared.progress.notify_all();
        }
    }

    let mut inner = shared.lock();
    inner.workers[index] = WorkerState::Stopped;
    inner.live_workers -= 1;
    if inner.live_workers == 0 {
        inner.state = PoolState::Stopped;
    }
    shared.progress.notify_all();
    debug!(worker = %name, "worker stopped");
}
