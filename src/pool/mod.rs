//! Bounded worker pool with future-based task submission.
//!
//! A fixed set of worker threads competes for one FIFO queue. Every
//! submission returns a [`TaskHandle`] immediately; workers resolve the
//! handle exactly once when the task finishes, fails or panics.
//!
//! ```no_run
//! use std::time::Duration;
//! use thread_labs::WorkerPool;
//!
//! let pool = WorkerPool::new(2).unwrap();
//! let pizza = pool.submit(|| "Ready: Pizza".to_string()).unwrap();
//! assert_eq!(pizza.wait().unwrap(), "Ready: Pizza");
//! pool.shutdown_graceful(Duration::from_secs(3)).unwrap();
//! ```

mod queue;
mod worker;

pub use queue::PendingTask;
pub use worker::WorkerState;

use std::error::Error as StdError;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Condvar, Mutex, MutexGuard};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::config::PoolConfig;
use crate::error::{BuildError, PoolError, RejectReason, TaskError};
use crate::handle::{self, TaskHandle, TaskId};
use crate::interrupt::CancelToken;
use queue::{Job, TaskQueue};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoolState {
    Accepting,
    /// Shutdown requested; queued work (if kept) is still being flushed.
    Draining,
    Stopped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownMode {
    Graceful,
    Forced,
}

/// Outcome of [`WorkerPool::shutdown`].
#[derive(Debug)]
pub enum ShutdownReport {
    /// Graceful: whether every task and worker finished within the timeout.
    Completed(bool),
    /// Forced: the queued tasks that never started.
    Forced(Vec<PendingTask>),
}

// =============================================================================
// Shared state
// =============================================================================

pub(crate) struct Inner {
    pub(crate) queue: TaskQueue,
    pub(crate) state: PoolState,
    pub(crate) workers: Vec<WorkerState>,
    pub(crate) active: usize,
    pub(crate) completed: u64,
    pub(crate) live_workers: usize,
    next_id: u64,
}

pub(crate) struct Shared {
    inner: Mutex<Inner>,
    /// Signalled when a job is queued or the pool stops accepting.
    pub(crate) work_available: Condvar,
    /// Signalled when a task finishes or a worker stops during shutdown.
    pub(crate) progress: Condvar,
    pub(crate) tokens: Vec<Arc<CancelToken>>,
}

impl Shared {
    pub(crate) fn lock(&self) -> MutexGuard<'_, Inner> {
        // Tasks run outside the lock, so a poisoned guard only means a
        // bookkeeping step panicked; the data is still consistent.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

// =============================================================================
// Pool
// =============================================================================

pub struct WorkerPool {
    shared: Arc<Shared>,
    threads: Mutex<Vec<JoinHandle<()>>>,
    config: PoolConfig,
}

impl fmt::Debug for WorkerPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.shared.lock();
        f.debug_struct("WorkerPool")
            .field("workers", &inner.workers)
            .field("state", &inner.state)
            .field("queued", &inner.queue.len())
            .field("active", &inner.active)
            .finish()
    }
}

impl WorkerPool {
    /// A pool of `workers` threads with an unbounded queue.
    pub fn new(workers: usize) -> Result<Self, BuildError> {
        Self::with_config(PoolConfig::with_workers(workers))
    }

    pub fn with_config(config: PoolConfig) -> Result<Self, BuildError> {
        config.validate()?;
        let count = config.workers;
        let shared = Arc::new(Shared {
            inner: Mutex::new(Inner {
                queue: TaskQueue::new(config.queue_capacity),
                state: PoolState::Accepting,
                workers: vec![WorkerState::Idle; count],
                active: 0,
                completed: 0,
                live_workers: count,
                next_id: 0,
            }),
            work_available: Condvar::new(),
            progress: Condvar::new(),
            tokens: (0..count).map(|_| Arc::new(CancelToken::new())).collect(),
        });

        let mut threads = Vec::with_capacity(count);
        for index in 0..count {
            let worker_shared = Arc::clone(&shared);
            let spawned = thread::Builder::new()
                .name(format!("{}-{}", config.thread_name_prefix, index))
                .spawn(move || worker::run(worker_shared, index));
            match spawned {
                Ok(handle) => threads.push(handle),
                Err(source) => {
                    Self::abort_startup(&shared, threads, index);
                    return Err(BuildError::Spawn { index, source });
                }
            }
        }

        info!(workers = count, capacity = ?config.queue_capacity, "worker pool started");
        Ok(Self {
            shared,
            threads: Mutex::new(threads),
            config,
        })
    }

    /// Stops the workers that did start when a later spawn failed.
    fn abort_startup(shared: &Shared, started: Vec<JoinHandle<()>>, failed_at: usize) {
        {
            let mut inner = shared.lock();
            inner.state = PoolState::Draining;
            // Workers that never spawned will never decrement the count.
            inner.live_workers = failed_at;
            for slot in inner.workers.iter_mut().skip(failed_at) {
                *slot = WorkerState::Stopped;
            }
        }
        shared.work_available.notify_all();
        for handle in started {
            let _ = handle.join();
        }
    }

    // -------------------------------------------------------------------------
    // Submission
    // -------------------------------------------------------------------------

    /// Queues a computation. A panic inside `task` becomes `TaskFailed`.
    pub fn submit<T, F>(&self, task: F) -> Result<TaskHandle<T>, PoolError>
    where
        T: Send + 'static,
        F: FnOnce() -> T + Send + 'static,
    {
        self.enqueue(move || Ok(task()))
    }

    /// Queues a computation that may fail; its error is delivered to every
    /// reader of the handle as the cause of `TaskFailed`.
    pub fn submit_fallible<T, E, F>(&self, task: F) -> Result<TaskHandle<T>, PoolError>
    where
        T: Send + 'static,
        E: StdError + Send + Sync + 'static,
        F: FnOnce() -> Result<T, E> + Send + 'static,
    {
        self.enqueue(move || task().map_err(TaskError::new))
    }

    /// Queues a fire-and-forget procedure. The handle only reports completion.
    pub fn execute<F>(&self, task: F) -> Result<TaskHandle<()>, PoolError>
    where
        F: FnOnce() + Send + 'static,
    {
        self.enqueue(move || {
            task();
            Ok(())
        })
    }

    fn enqueue<T, F>(&self, task: F) -> Result<TaskHandle<T>, PoolError>
    where
        T: Send + 'static,
        F: FnOnce() -> Result<T, TaskError> + Send + 'static,
    {
        let mut inner = self.shared.lock();
        if inner.state != PoolState::Accepting {
            return Err(PoolError::rejected(RejectReason::ShuttingDown));
        }

        let id = TaskId(inner.next_id);
        let (completer, handle) = handle::pair(id);
        let job = Job::new(id, move || {
            let outcome = match panic::catch_unwind(AssertUnwindSafe(task)) {
                Ok(result) => result.map_err(PoolError::TaskFailed),
                Err(payload) => {
                    let err = TaskError::from_panic(payload);
                    warn!(task = %id, error = %err, "task panicked");
                    Err(PoolError::TaskFailed(err))
                }
            };
            completer.complete(outcome);
        });

        if let Err(rejected) = inner.queue.push(job) {
            let capacity = inner.queue.capacity().unwrap_or_default();
            drop(inner);
            // Nobody holds this handle yet, so discarding it is invisible.
            drop(rejected);
            return Err(PoolError::rejected(RejectReason::QueueFull { capacity }));
        }
        inner.next_id += 1;
        drop(inner);

        self.shared.work_available.notify_one();
        debug!(task = %id, "task submitted");
        Ok(handle)
    }

    // -------------------------------------------------------------------------
    // Shutdown
    // -------------------------------------------------------------------------

    /// Stops accepting work, lets queued and running tasks finish and waits up
    /// to `timeout` for every worker to stop.
    ///
    /// On timeout the workers keep draining in the background; call again to
    /// keep waiting or escalate with [`shutdown_now`](Self::shutdown_now).
    pub fn shutdown_graceful(&self, timeout: Duration) -> Result<(), PoolError> {
        self.begin_shutdown();
        if self.await_termination(timeout) {
            self.join_workers();
            info!("worker pool stopped");
            Ok(())
        } else {
            let unfinished = {
                let inner = self.shared.lock();
                inner.queue.len() + inner.active
            };
            warn!(?timeout, unfinished, "graceful shutdown timed out");
            Err(PoolError::ShutdownTimeout {
                timeout,
                unfinished,
            })
        }
    }

    /// Stops accepting work, interrupts running tasks and returns the queued
    /// tasks that never started. Does not wait for the workers.
    ///
    /// Interruption is cooperative: a task only notices it through
    /// [`interrupt`](crate::interrupt); one that never checks runs to the end.
    pub fn shutdown_now(&self) -> Vec<PendingTask> {
        let discarded: Vec<PendingTask> = {
            let mut inner = self.shared.lock();
            if inner.state == PoolState::Stopped {
                return Vec::new();
            }
            inner.state = PoolState::Draining;
            inner.queue.drain().into_iter().map(PendingTask::new).collect()
        };
        for token in &self.shared.tokens {
            token.cancel();
        }
        self.shared.work_available.notify_all();
        if !discarded.is_empty() {
            warn!(discarded = discarded.len(), "forced shutdown discarded queued tasks");
        }
        discarded
    }

    pub fn shutdown(&self, mode: ShutdownMode, timeout: Duration) -> ShutdownReport {
        match mode {
            ShutdownMode::Graceful => {
                ShutdownReport::Completed(self.shutdown_graceful(timeout).is_ok())
            }
            ShutdownMode::Forced => ShutdownReport::Forced(self.shutdown_now()),
        }
    }

    /// Blocks until every worker stopped or `timeout` elapsed. Returns `true`
    /// when the pool is `Stopped`. Does not itself request a shutdown.
    ///
    /// A timeout too large to add to `Instant::now()` waits without a bound.
    pub fn await_termination(&self, timeout: Duration) -> bool {
        let deadline = Instant::now().checked_add(timeout);
        let mut inner = self.shared.lock();
        while inner.state != PoolState::Stopped {
            inner = match deadline {
                Some(deadline) => {
                    let now = Instant::now();
                    if now >= deadline {
                        return false;
                    }
                    self.shared
                        .progress
                        .wait_timeout(inner, deadline - now)
                        .unwrap_or_else(|e| e.into_inner())
                        .0
                }
                None => self
                    .shared
                    .progress
                    .wait(inner)
                    .unwrap_or_else(|e| e.into_inner()),
            };
        }
        true
    }

    fn begin_shutdown(&self) {
        {
            let mut inner = self.shared.lock();
            if inner.state == PoolState::Accepting {
                inner.state = PoolState::Draining;
                debug!(queued = inner.queue.len(), "pool draining");
            }
        }
        self.shared.work_available.notify_all();
    }

    fn join_workers(&self) {
        let threads: Vec<_> = {
            let mut guard = self.threads.lock().unwrap_or_else(|e| e.into_inner());
            guard.drain(..).collect()
        };
        for handle in threads {
            if handle.join().is_err() {
                warn!("worker thread panicked outside a task");
            }
        }
    }

    // -------------------------------------------------------------------------
    // Introspection
    // -------------------------------------------------------------------------

    pub fn state(&self) -> PoolState {
        self.shared.lock().state
    }

    pub fn is_shutdown(&self) -> bool {
        self.state() != PoolState::Accepting
    }

    pub fn worker_states(&self) -> Vec<WorkerState> {
        self.shared.lock().workers.clone()
    }

    pub fn workers(&self) -> usize {
        self.config.workers
    }

    pub fn queued(&self) -> usize {
        self.shared.lock().queue.len()
    }

    pub fn active(&self) -> usize {
        self.shared.lock().active
    }

    /// Tasks run to the end so far, successful or not.
    pub fn completed(&self) -> u64 {
        self.shared.lock().completed
    }

    pub fn config(&self) -> &PoolConfig {
        &self.config
    }
}

impl Drop for WorkerPool {
    /// Graceful shutdown without a bound: queued work still runs.
    fn drop(&mut self) {
        self.begin_shutdown();
        self.join_workers();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Interrupted;
    use crate::interrupt;
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Barrier;

    #[derive(thiserror::Error, Debug)]
    #[error("kitchen out of flour")]
    struct OutOfFlour;

    const LONG: Duration = Duration::from_secs(10);

    #[test]
    fn test_zero_workers_is_rejected() {
        assert!(matches!(WorkerPool::new(0), Err(BuildError::Config(_))));
    }

    #[test]
    fn test_every_submission_resolves_once() {
        for workers in [1, 2, 4] {
            let pool = WorkerPool::new(workers).unwrap();
            let runs = Arc::new(AtomicUsize::new(0));
            let handles: Vec<_> = (0..50)
                .map(|i| {
                    let runs = Arc::clone(&runs);
                    pool.submit(move || {
                        runs.fetch_add(1, Ordering::SeqCst);
                        i * 2
                    })
                    .unwrap()
                })
                .collect();

            assert_eq!(handles.len(), 50);
            for (i, handle) in handles.iter().enumerate() {
                assert_eq!(handle.wait().unwrap(), i * 2);
            }
            pool.shutdown_graceful(LONG).unwrap();
            assert_eq!(runs.load(Ordering::SeqCst), 50);
            assert_eq!(pool.completed(), 50);
        }
    }

    #[test]
    fn test_task_ids_follow_submission_order() {
        let pool = WorkerPool::new(1).unwrap();
        let ids: Vec<_> = (0..5).map(|_| pool.execute(|| {}).unwrap().id()).collect();
        assert_eq!(ids, (0..5).map(TaskId).collect::<Vec<_>>());
        assert_eq!(ids.iter().map(|id| id.get()).collect::<Vec<_>>(), vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_single_worker_dequeues_in_fifo_order() {
        let pool = WorkerPool::new(1).unwrap();
        let order = Arc::new(Mutex::new(Vec::new()));
        let gate = Arc::new(Barrier::new(2));

        let blocker = {
            let gate = Arc::clone(&gate);
            pool.execute(move || {
                gate.wait();
            })
            .unwrap()
        };
        for i in 0..5 {
            let order = Arc::clone(&order);
            pool.execute(move || order.lock().unwrap().push(i)).unwrap();
        }
        gate.wait();
        blocker.wait().unwrap();
        pool.shutdown_graceful(LONG).unwrap();
        assert_eq!(*order.lock().unwrap(), vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_two_workers_five_tasks_take_three_rounds() {
        let d = Duration::from_millis(200);
        let pool = WorkerPool::new(2).unwrap();
        let start = Instant::now();
        let handles: Vec<_> = (0..5)
            .map(|_| pool.execute(move || std::thread::sleep(d)).unwrap())
            .collect();
        for handle in &handles {
            handle.wait().unwrap();
        }
        let elapsed = start.elapsed();
        assert!(elapsed >= d * 3, "finished too early: {elapsed:?}");
        assert!(elapsed < d * 4, "expected about three rounds: {elapsed:?}");
    }

    #[test]
    fn test_failure_is_wrapped_and_pool_keeps_serving() {
        let pool = WorkerPool::new(2).unwrap();
        let failing = pool.submit_fallible(|| -> Result<u32, OutOfFlour> { Err(OutOfFlour) }).unwrap();

        let err = failing.wait().unwrap_err();
        assert!(err.task_error().unwrap().downcast_ref::<OutOfFlour>().is_some());
        assert!(err.to_string().contains("out of flour"));
        // Same failure on every read.
        assert!(failing.wait().unwrap_err().task_error().is_some());

        let next = pool.submit(|| 7).unwrap();
        assert_eq!(next.wait().unwrap(), 7);
    }

    #[test]
    fn test_panicking_task_does_not_kill_worker() {
        let pool = WorkerPool::new(1).unwrap();
        let boom = pool.submit(|| -> u8 { panic!("pan on fire") }).unwrap();
        let err = boom.wait().unwrap_err();
        assert!(err.task_error().unwrap().is_panic());
        assert!(err.to_string().contains("pan on fire"));

        assert_eq!(pool.submit(|| 1 + 1).unwrap().wait().unwrap(), 2);
        assert!(!pool.worker_states().contains(&WorkerState::Stopped));
    }

    #[test]
    fn test_zero_timeout_then_wait_succeeds() {
        let pool = WorkerPool::new(1).unwrap();
        let gate = Arc::new(Barrier::new(2));
        let handle = {
            let gate = Arc::clone(&gate);
            pool.submit(move || {
                gate.wait();
                "done"
            })
            .unwrap()
        };

        assert!(matches!(
            handle.wait_timeout(Duration::ZERO),
            Err(PoolError::AwaitTimeout { .. })
        ));
        gate.wait();
        assert_eq!(handle.wait().unwrap(), "done");
    }

    #[test]
    fn test_concurrent_waiters_share_one_execution() {
        let pool = WorkerPool::new(2).unwrap();
        let runs = Arc::new(AtomicUsize::new(0));
        let handle = {
            let runs = Arc::clone(&runs);
            pool.submit(move || {
                std::thread::sleep(Duration::from_millis(50));
                runs.fetch_add(1, Ordering::SeqCst)
            })
            .unwrap()
        };
        let readers: Vec<_> = (0..6)
            .map(|_| {
                let handle = handle.clone();
                std::thread::spawn(move || handle.wait().unwrap())
            })
            .collect();
        for reader in readers {
            assert_eq!(reader.join().unwrap(), 0);
        }
        assert_eq!(runs.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_submit_after_shutdown_is_rejected() {
        let pool = WorkerPool::new(2).unwrap();
        pool.shutdown_graceful(LONG).unwrap();
        assert_eq!(pool.state(), PoolState::Stopped);

        let err = pool.submit(|| 1).unwrap_err();
        assert!(matches!(
            err,
            PoolError::RejectedSubmission {
                reason: RejectReason::ShuttingDown
            }
        ));
        assert_eq!(pool.queued(), 0);
    }

    #[test]
    fn test_graceful_shutdown_drains_queue() {
        let pool = WorkerPool::new(2).unwrap();
        let done = Arc::new(AtomicUsize::new(0));
        for _ in 0..10 {
            let done = Arc::clone(&done);
            pool.execute(move || {
                std::thread::sleep(Duration::from_millis(10));
                done.fetch_add(1, Ordering::SeqCst);
            })
            .unwrap();
        }
        pool.shutdown_graceful(LONG).unwrap();
        assert_eq!(done.load(Ordering::SeqCst), 10);
        assert!(pool.worker_states().iter().all(|s| *s == WorkerState::Stopped));
    }

    #[test]
    fn test_graceful_shutdown_times_out_then_completes() {
        let pool = WorkerPool::new(1).unwrap();
        pool.execute(|| std::thread::sleep(Duration::from_millis(300))).unwrap();
        while pool.active() == 0 {
            std::thread::yield_now();
        }

        let err = pool.shutdown_graceful(Duration::from_millis(20)).unwrap_err();
        assert!(matches!(err, PoolError::ShutdownTimeout { unfinished: 1, .. }));
        assert_eq!(pool.state(), PoolState::Draining);

        pool.shutdown_graceful(LONG).unwrap();
        assert_eq!(pool.state(), PoolState::Stopped);
    }

    #[test]
    fn test_shutdown_is_idempotent() {
        let pool = WorkerPool::new(2).unwrap();
        pool.shutdown_graceful(LONG).unwrap();
        assert!(pool.shutdown_graceful(Duration::ZERO).is_ok());
        assert!(pool.shutdown_now().is_empty());
        assert!(matches!(
            pool.shutdown(ShutdownMode::Graceful, Duration::ZERO),
            ShutdownReport::Completed(true)
        ));
    }

    #[test]
    fn test_unbounded_timeouts_wait_instead_of_overflowing() {
        let pool = WorkerPool::new(1).unwrap();
        let sleeper = pool
            .submit_fallible(|| interrupt::sleep(Duration::MAX))
            .unwrap();
        while pool.active() == 0 {
            std::thread::yield_now();
        }
        assert!(!pool.is_shutdown());

        assert!(pool.shutdown_now().is_empty());
        assert!(pool.is_shutdown());
        assert!(pool.await_termination(Duration::MAX));
        let cause = sleeper.wait().unwrap_err();
        assert!(cause.task_error().unwrap().downcast_ref::<Interrupted>().is_some());
        assert!(!cause.task_error().unwrap().is_panic());

        let drained = WorkerPool::new(2).unwrap();
        let value = drained.submit(|| 5).unwrap();
        drained.shutdown_graceful(Duration::MAX).unwrap();
        assert!(matches!(
            drained.shutdown(ShutdownMode::Graceful, Duration::MAX),
            ShutdownReport::Completed(true)
        ));
        assert_eq!(value.wait().unwrap(), 5);
    }

    #[test]
    fn test_forced_mode_reports_queued_tasks() {
        let pool = WorkerPool::new(1).unwrap();
        let gate = Arc::new(Barrier::new(2));
        let total = 4;
        {
            let gate = Arc::clone(&gate);
            pool.execute(move || {
                gate.wait();
            })
            .unwrap();
        }
        for _ in 1..total {
            pool.execute(|| {}).unwrap();
        }
        while pool.active() == 0 {
            std::thread::yield_now();
        }

        let ShutdownReport::Forced(discarded) = pool.shutdown(ShutdownMode::Forced, Duration::ZERO)
        else {
            panic!("forced shutdown produced a graceful report");
        };
        gate.wait();
        assert!(pool.await_termination(LONG));
        assert_eq!(discarded.len(), total - 1);
        assert_eq!(discarded.len() as u64 + pool.completed(), total as u64);
    }

    #[test]
    fn test_graceful_mode_reports_unfinished_work() {
        let pool = WorkerPool::new(1).unwrap();
        pool.execute(|| std::thread::sleep(Duration::from_millis(300))).unwrap();
        while pool.active() == 0 {
            std::thread::yield_now();
        }

        assert!(matches!(
            pool.shutdown(ShutdownMode::Graceful, Duration::from_millis(20)),
            ShutdownReport::Completed(false)
        ));
        assert!(matches!(
            pool.shutdown(ShutdownMode::Graceful, LONG),
            ShutdownReport::Completed(true)
        ));
    }

    #[test]
    fn test_forced_shutdown_accounts_for_every_task() {
        let pool = WorkerPool::new(2).unwrap();
        let completed = Arc::new(AtomicUsize::new(0));
        let started = Arc::new(Barrier::new(3));
        let total = 12;

        let handles: Vec<_> = (0..total)
            .map(|i| {
                let completed = Arc::clone(&completed);
                let started = Arc::clone(&started);
                pool.submit_fallible(move || -> Result<(), Interrupted> {
                    if i < 2 {
                        started.wait();
                    }
                    interrupt::sleep(LONG)?;
                    completed.fetch_add(1, Ordering::SeqCst);
                    Ok(())
                })
                .unwrap()
            })
            .collect();

        // Both workers are inside a task; everything else is still queued.
        started.wait();
        let discarded = pool.shutdown_now();
        assert!(pool.await_termination(LONG));

        let interrupted = handles[..2]
            .iter()
            .filter(|h| {
                h.wait()
                    .err()
                    .and_then(|e| e.task_error().cloned())
                    .is_some_and(|e| e.downcast_ref::<Interrupted>().is_some())
            })
            .count();
        assert_eq!(discarded.len(), total - 2);
        assert_eq!(interrupted, 2);
        assert_eq!(
            discarded.len() + interrupted + completed.load(Ordering::SeqCst),
            total
        );

        let ids: HashSet<_> = discarded.iter().map(PendingTask::id).collect();
        assert_eq!(ids.len(), total - 2);
        drop(discarded);
        for handle in &handles[2..] {
            assert!(matches!(handle.wait(), Err(PoolError::TaskDiscarded)));
        }
    }

    #[test]
    fn test_discarded_task_can_be_run_by_caller() {
        let pool = WorkerPool::new(1).unwrap();
        let gate = Arc::new(Barrier::new(2));
        {
            let gate = Arc::clone(&gate);
            pool.execute(move || {
                gate.wait();
            })
            .unwrap();
        }
        let later = pool.submit(|| "ran on caller").unwrap();
        while pool.active() == 0 {
            std::thread::yield_now();
        }

        let mut discarded = pool.shutdown_now();
        gate.wait();
        assert_eq!(discarded.len(), 1);
        discarded.pop().unwrap().run();
        assert_eq!(later.wait().unwrap(), "ran on caller");
    }

    #[test]
    fn test_bounded_queue_rejects_without_blocking() {
        let config = PoolConfig::with_workers(1).queue_capacity(1);
        let pool = WorkerPool::with_config(config).unwrap();
        let gate = Arc::new(Barrier::new(2));
        {
            let gate = Arc::clone(&gate);
            pool.execute(move || {
                gate.wait();
            })
            .unwrap();
        }
        while pool.active() == 0 {
            std::thread::yield_now();
        }

        pool.execute(|| {}).unwrap();
        let err = pool.execute(|| {}).unwrap_err();
        assert!(matches!(
            err,
            PoolError::RejectedSubmission {
                reason: RejectReason::QueueFull { capacity: 1 }
            }
        ));
        gate.wait();
        pool.shutdown_graceful(LONG).unwrap();
    }

    #[test]
    fn test_workers_use_configured_names() {
        let config = PoolConfig::with_workers(2).thread_name_prefix("chef");
        let pool = WorkerPool::with_config(config).unwrap();
        let name = pool
            .submit(|| std::thread::current().name().map(str::to_string))
            .unwrap()
            .wait()
            .unwrap()
            .unwrap();
        assert!(name == "chef-0" || name == "chef-1", "unexpected name {name}");
    }

    #[test]
    fn test_drop_runs_queued_work() {
        let done = Arc::new(AtomicUsize::new(0));
        {
            let pool = WorkerPool::new(2).unwrap();
            for _ in 0..8 {
                let done = Arc::clone(&done);
                pool.execute(move || {
                    done.fetch_add(1, Ordering::SeqCst);
                })
                .unwrap();
            }
        }
        assert_eq!(done.load(Ordering::SeqCst), 8);
    }
}
