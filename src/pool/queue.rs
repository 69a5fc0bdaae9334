//! FIFO task queue shared by the workers.
//!
//! The queue itself is plain data; the pool keeps it behind the same mutex
//! as its lifecycle state so "check accepting + enqueue" is one step.

use std::collections::VecDeque;
use std::fmt;

use crate::handle::TaskId;

type Thunk = Box<dyn FnOnce() + Send + 'static>;

/// A type-erased task. Running it resolves its handle; dropping it without
/// running resolves the handle as discarded.
pub(crate) struct Job {
    id: TaskId,
    thunk: Thunk,
}

impl Job {
    pub(crate) fn new<F>(id: TaskId, thunk: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        Self {
            id,
            thunk: Box::new(thunk),
        }
    }

    pub(crate) fn id(&self) -> TaskId {
        self.id
    }

    pub(crate) fn run(self) {
        (self.thunk)()
    }
}

pub(crate) struct TaskQueue {
    jobs: VecDeque<Job>,
    capacity: Option<usize>,
}

impl TaskQueue {
    pub(crate) fn new(capacity: Option<usize>) -> Self {
        let jobs = match capacity {
            Some(cap) => VecDeque::with_capacity(cap),
            None => VecDeque::new(),
        };
        Self { jobs, capacity }
    }

    /// Hands the job back when the queue is bounded and full.
    pub(crate) fn push(&mut self, job: Job) -> Result<(), Job> {
        if self.is_full() {
            return Err(job);
        }
        self.jobs.push_back(job);
        Ok(())
    }

    pub(crate) fn pop(&mut self) -> Option<Job> {
        self.jobs.pop_front()
    }

    pub(crate) fn drain(&mut self) -> Vec<Job> {
        self.jobs.drain(..).collect()
    }

    pub(crate) fn len(&self) -> usize {
        self.jobs.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    pub(crate) fn is_full(&self) -> bool {
        self.capacity.is_some_and(|cap| self.jobs.len() >= cap)
    }

    pub(crate) fn capacity(&self) -> Option<usize> {
        self.capacity
    }
}

/// A task that was still queued when the pool was forcibly shut down.
///
/// Call [`run`](Self::run) to execute it on the current thread, or drop it;
/// its handle then reports [`PoolError::TaskDiscarded`](crate::PoolError::TaskDiscarded).
pub struct PendingTask {
    job: Job,
}

impl PendingTask {
    pub(crate) fn new(job: Job) -> Self {
        Self { job }
    }

    pub fn id(&self) -> TaskId {
        self.job.id()
    }

    pub fn run(self) {
        self.job.run()
    }
}

impl fmt::Debug for PendingTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingTask").field("id", &self.id()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn job(id: u64, log: &Arc<std::sync::Mutex<Vec<u64>>>) -> Job {
        let log = Arc::clone(log);
        Job::new(TaskId(id), move || log.lock().unwrap().push(id))
    }

    #[test]
    fn test_fifo_order() {
        let log = Arc::new(std::sync::Mutex::new(Vec::new()));
        let mut queue = TaskQueue::new(None);
        for id in 1..=4 {
            assert!(queue.push(job(id, &log)).is_ok());
        }
        while let Some(job) = queue.pop() {
            job.run();
        }
        assert_eq!(*log.lock().unwrap(), vec![1, 2, 3, 4]);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_bounded_queue_hands_back_overflow() {
        let log = Arc::new(std::sync::Mutex::new(Vec::new()));
        let mut queue = TaskQueue::new(Some(2));
        assert!(queue.push(job(1, &log)).is_ok());
        assert!(queue.push(job(2, &log)).is_ok());
        assert!(queue.is_full());

        let rejected = queue.push(job(3, &log)).unwrap_err();
        assert_eq!(rejected.id(), TaskId(3));
        assert_eq!(queue.len(), 2);
        assert_eq!(queue.capacity(), Some(2));
    }

    #[test]
    fn test_drain_empties_in_order() {
        let ran = Arc::new(AtomicUsize::new(0));
        let mut queue = TaskQueue::new(None);
        for id in 0..3 {
            let ran = Arc::clone(&ran);
            queue
                .push(Job::new(TaskId(id), move || {
                    ran.fetch_add(1, Ordering::SeqCst);
                }))
                .ok();
        }
        let drained: Vec<_> = queue.drain().into_iter().map(PendingTask::new).collect();
        assert!(queue.is_empty());
        assert_eq!(
            drained.iter().map(PendingTask::id).collect::<Vec<_>>(),
            vec![TaskId(0), TaskId(1), TaskId(2)]
        );

        drained.into_iter().for_each(PendingTask::run);
        assert_eq!(ran.load(Ordering::SeqCst), 3);
    }
}
