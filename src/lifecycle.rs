//! Observable thread lifecycle.
//!
//! The standard library does not expose a thread's scheduling state, so a
//! [`TrackedThread`] records it itself: `New` until started, `Runnable` while
//! executing, `TimedWaiting` inside [`LifecycleProbe::sleep`] and
//! `Terminated` once the body returns or panics.

use std::fmt;
use std::io;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ThreadState {
    New = 0,
    Runnable = 1,
    TimedWaiting = 2,
    Terminated = 3,
}

impl ThreadState {
    fn from_u8(raw: u8) -> Self {
        match raw {
            0 => ThreadState::New,
            1 => ThreadState::Runnable,
            2 => ThreadState::TimedWaiting,
            _ => ThreadState::Terminated,
        }
    }

    pub fn describe(self) -> &'static str {
        match self {
            ThreadState::New => "created but not yet started",
            ThreadState::Runnable => "executing or ready to execute",
            ThreadState::TimedWaiting => "sleeping for a bounded time",
            ThreadState::Terminated => "finished execution",
        }
    }
}

impl fmt::Display for ThreadState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ThreadState::New => "NEW",
            ThreadState::Runnable => "RUNNABLE",
            ThreadState::TimedWaiting => "TIMED_WAITING",
            ThreadState::Terminated => "TERMINATED",
        };
        f.write_str(name)
    }
}

/// Handed to the thread body so it can report what it is doing.
#[derive(Clone)]
pub struct LifecycleProbe {
    state: Arc<AtomicU8>,
}

impl LifecycleProbe {
    fn set(&self, state: ThreadState) {
        self.state.store(state as u8, Ordering::SeqCst);
    }

    pub fn sleep(&self, duration: Duration) {
        self.set(ThreadState::TimedWaiting);
        thread::sleep(duration);
        self.set(ThreadState::Runnable);
    }
}

struct TerminateOnDrop(LifecycleProbe);

impl Drop for TerminateOnDrop {
    fn drop(&mut self) {
        self.0.set(ThreadState::Terminated);
    }
}

type Body<T> = Box<dyn FnOnce(&LifecycleProbe) -> T + Send + 'static>;

pub struct TrackedThread<T> {
    name: String,
    state: Arc<AtomicU8>,
    body: Option<Body<T>>,
    handle: Option<JoinHandle<T>>,
}

impl<T: Send + 'static> TrackedThread<T> {
    pub fn new<F>(name: impl Into<String>, body: F) -> Self
    where
        F: FnOnce(&LifecycleProbe) -> T + Send + 'static,
    {
        Self {
            name: name.into(),
            state: Arc::new(AtomicU8::new(ThreadState::New as u8)),
            body: Some(Box::new(body)),
            handle: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn state(&self) -> ThreadState {
        ThreadState::from_u8(self.state.load(Ordering::SeqCst))
    }

    /// Starts the thread. Starting twice is a no-op.
    pub fn start(&mut self) -> io::Result<()> {
        let Some(body) = self.body.take() else {
            return Ok(());
        };
        let probe = LifecycleProbe {
            state: Arc::clone(&self.state),
        };
        probe.set(ThreadState::Runnable);
        let spawned = thread::Builder::new().name(self.name.clone()).spawn(move || {
            let _terminate = TerminateOnDrop(probe.clone());
            body(&probe)
        });
        match spawned {
            Ok(handle) => {
                self.handle = Some(handle);
                Ok(())
            }
            Err(err) => {
                self.state.store(ThreadState::New as u8, Ordering::SeqCst);
                Err(err)
            }
        }
    }

    pub fn is_alive(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Samples the state every `interval` until the thread ends and returns
    /// each distinct state in the order it was observed, starting with the
    /// current one.
    pub fn poll_transitions(&self, interval: Duration) -> Vec<ThreadState> {
        let mut seen = vec![self.state()];
        while self.is_alive() {
            let state = self.state();
            if seen.last() != Some(&state) {
                seen.push(state);
            }
            thread::sleep(interval);
        }
        let last = self.state();
        if seen.last() != Some(&last) {
            seen.push(last);
        }
        seen
    }

    /// `None` if the thread was never started.
    pub fn join(mut self) -> Option<thread::Result<T>> {
        self.handle.take().map(JoinHandle::join)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_walks_through_lifecycle() {
        let mut worker = TrackedThread::new("sleepy", |probe: &LifecycleProbe| {
            probe.sleep(Duration::from_millis(200));
            "done"
        });
        assert_eq!(worker.state(), ThreadState::New);
        assert!(!worker.is_alive());

        worker.start().unwrap();
        assert_ne!(worker.state(), ThreadState::New);
        let transitions = worker.poll_transitions(Duration::from_millis(10));
        assert!(transitions.contains(&ThreadState::TimedWaiting));
        assert_eq!(transitions.last(), Some(&ThreadState::Terminated));

        assert_eq!(worker.join().unwrap().unwrap(), "done");
    }

    #[test]
    fn test_panic_still_terminates() {
        let mut worker = TrackedThread::new("doomed", |_: &LifecycleProbe| -> () {
            panic!("worker failed");
        });
        worker.start().unwrap();
        while worker.is_alive() {
            thread::sleep(Duration::from_millis(5));
        }
        assert_eq!(worker.state(), ThreadState::Terminated);
        assert!(worker.join().unwrap().is_err());
    }

    #[test]
    fn test_unstarted_thread_has_nothing_to_join() {
        let worker = TrackedThread::new("idle", |_: &LifecycleProbe| 1);
        assert!(worker.join().is_none());
    }

    #[test]
    fn test_display_names() {
        assert_eq!(ThreadState::TimedWaiting.to_string(), "TIMED_WAITING");
        assert!(ThreadState::New.describe().contains("not yet started"));
    }
}
