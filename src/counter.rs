//! Shared counters for the race-condition lab.
//!
//! `MutexCounter` and `AtomicCounter` never lose an increment.
//! `LostUpdateCounter` splits the increment into a separate load and store,
//! so two threads can read the same value and overwrite each other. It is
//! still free of undefined behaviour (every access is atomic), it is just
//! wrong. It only exists with the `racy-counter` feature.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::thread;

pub trait Counter: Sync {
    fn increment(&self);
    fn get(&self) -> u64;
}

#[derive(Debug, Default)]
pub struct MutexCounter {
    count: Mutex<u64>,
}

impl MutexCounter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Counter for MutexCounter {
    fn increment(&self) {
        let mut count = self.count.lock().unwrap_or_else(|e| e.into_inner());
        *count += 1;
    }

    fn get(&self) -> u64 {
        *self.count.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[derive(Debug, Default)]
pub struct AtomicCounter {
    count: AtomicU64,
}

impl AtomicCounter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Counter for AtomicCounter {
    fn increment(&self) {
        self.count.fetch_add(1, Ordering::Relaxed);
    }

    fn get(&self) -> u64 {
        self.count.load(Ordering::SeqCst)
    }
}

#[cfg(feature = "racy-counter")]
#[derive(Debug, Default)]
pub struct LostUpdateCounter {
    count: AtomicU64,
}

#[cfg(feature = "racy-counter")]
impl LostUpdateCounter {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(feature = "racy-counter")]
impl Counter for LostUpdateCounter {
    fn increment(&self) {
        // read -> modify -> write, with a window between read and write
        let current = self.count.load(Ordering::Relaxed);
        std::hint::spin_loop();
        self.count.store(current + 1, Ordering::Relaxed);
    }

    fn get(&self) -> u64 {
        self.count.load(Ordering::SeqCst)
    }
}

/// Result of driving a counter from several threads at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HammerReport {
    pub expected: u64,
    pub actual: u64,
}

impl HammerReport {
    pub fn lost(&self) -> u64 {
        self.expected.saturating_sub(self.actual)
    }

    pub fn is_exact(&self) -> bool {
        self.expected == self.actual
    }
}

/// Increments `counter` `iterations` times from each of `threads` threads.
pub fn hammer<C: Counter + ?Sized>(counter: &C, threads: usize, iterations: u64) -> HammerReport {
    thread::scope(|scope| {
        for _ in 0..threads {
            scope.spawn(|| {
                for _ in 0..iterations {
                    counter.increment();
                }
            });
        }
    });
    HammerReport {
        expected: threads as u64 * iterations,
        actual: counter.get(),
    }
}
