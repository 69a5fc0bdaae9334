//! Background ("daemon") work with explicit cancellation.
//!
//! A [`BackgroundTask`] may outlive the code that started it, but never the
//! process: it is stopped by [`BackgroundTask::stop`] or when its handle drops.

use std::io;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tracing::debug;

use crate::interrupt::CancelToken;

pub struct BackgroundTask {
    name: String,
    token: Arc<CancelToken>,
    ticks: Arc<AtomicU64>,
    thread: Option<JoinHandle<()>>,
}

impl BackgroundTask {
    /// Runs `tick(n)` every `period` on a dedicated thread named `name`,
    /// starting one period after the call.
    pub fn spawn<F>(name: impl Into<String>, period: Duration, mut tick: F) -> io::Result<Self>
    where
        F: FnMut(u64) + Send + 'static,
    {
        let name = name.into();
        let token = Arc::new(CancelToken::new());
        let ticks = Arc::new(AtomicU64::new(0));

        let thread = {
            let token = Arc::clone(&token);
            let ticks = Arc::clone(&ticks);
            thread::Builder::new().name(name.clone()).spawn(move || {
                while token.sleep(period).is_ok() {
                    let n = ticks.fetch_add(1, Ordering::SeqCst) + 1;
                    tick(n);
                }
            })?
        };
        debug!(task = %name, ?period, "background task started");

        Ok(Self {
            name,
            token,
            ticks,
            thread: Some(thread),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ticks(&self) -> u64 {
        self.ticks.load(Ordering::SeqCst)
    }

    pub fn is_running(&self) -> bool {
        self.thread.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// Cancels the loop, waits for an in-progress tick and returns the tick count.
    pub fn stop(mut self) -> u64 {
        self.shutdown();
        self.ticks()
    }

    fn shutdown(&mut self) {
        self.token.cancel();
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
            debug!(task = %self.name, ticks = self.ticks(), "background task stopped");
        }
    }
}

impl Drop for BackgroundTask {
    fn drop(&mut self) {
        self.shutdown();
    }
}
