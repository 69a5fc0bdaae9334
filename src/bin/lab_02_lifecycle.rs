//! Lab 2: Thread Lifecycle
//! Watching a thread move between states
//!
//! Run with: cargo run --bin lab_02_lifecycle

use std::time::Duration;

use anyhow::{anyhow, Result};
use colored::Colorize;
use thread_labs::lifecycle::{LifecycleProbe, ThreadState, TrackedThread};
use thread_labs::{report, telemetry};

fn main() -> Result<()> {
    telemetry::init();
    report::banner("Thread Lifecycle Lab");

    let mut worker = TrackedThread::new("lifecycle-worker", |probe: &LifecycleProbe| {
        println!("[Worker] running, about to sleep for 2 seconds");
        probe.sleep(Duration::from_secs(2));
        println!("[Worker] woke up, finishing");
    });

    println!("Initial state: {}", worker.state().to_string().yellow());
    worker.start()?;

    let mut previous: Option<ThreadState> = None;
    for state in worker.poll_transitions(Duration::from_millis(100)) {
        match previous {
            Some(prev) => println!("State change: {prev} -> {}", state.to_string().yellow()),
            None => println!("After start(): {}", state.to_string().yellow()),
        }
        println!("  ({})", state.describe());
        previous = Some(state);
    }

    worker
        .join()
        .ok_or_else(|| anyhow!("worker never started"))?
        .map_err(|_| anyhow!("worker panicked"))?;

    report::key_points(&[
        "NEW: constructed, start() not called yet",
        "RUNNABLE: executing (or ready to) on a CPU",
        "TIMED_WAITING: sleeping or waiting with a timeout",
        "TERMINATED: the body returned; join() no longer blocks",
        "Rust does not expose scheduler states, so the thread reports its own",
    ]);
    Ok(())
}
