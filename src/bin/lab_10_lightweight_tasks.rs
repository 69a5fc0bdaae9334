//! Lab 10: Lightweight Tasks
//! 100,000 concurrent sleeps on a handful of OS threads
//!
//! Run with: cargo run --release --bin lab_10_lightweight_tasks

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use colored::Colorize;
use futures::future::join_all;
use thread_labs::{report, telemetry};

const TASKS: usize = 100_000;
const SLEEP: Duration = Duration::from_secs(1);

#[tokio::main]
async fn main() -> Result<()> {
    telemetry::init();
    report::banner("Lightweight Task Lab");

    let cores = num_cpus::get();
    println!("Available CPU cores: {cores}");
    println!("Spawning {TASKS} tasks that each sleep {}s\n", SLEEP.as_secs());

    let completed = Arc::new(AtomicUsize::new(0));
    let start = Instant::now();

    let tasks = (0..TASKS).map(|task_id| {
        let completed = Arc::clone(&completed);
        tokio::spawn(async move {
            // An async sleep parks the task, not the thread.
            tokio::time::sleep(SLEEP).await;
            if task_id == 0 {
                println!("[Sample Task] running on {:?}", std::thread::current().id());
            }
            let done = completed.fetch_add(1, Ordering::Relaxed) + 1;
            if done % 10_000 == 0 {
                println!("Progress: {done} / {TASKS} tasks completed");
            }
        })
    });
    for joined in join_all(tasks).await {
        joined?;
    }

    let elapsed = start.elapsed();
    report::section("Results");
    println!("Total execution time: {} ms", report::millis(elapsed));
    println!("Completed tasks: {}", completed.load(Ordering::Relaxed));

    let sequential = SLEEP * TASKS as u32;
    println!(
        "Sequential would take: {} s; speedup {}",
        sequential.as_secs(),
        format!("{:.0}x", report::speedup(sequential, elapsed)).green()
    );

    report::key_points(&[
        "A tokio task is a state machine, not an OS thread",
        "While a task awaits, its worker thread runs other tasks",
        "100,000 OS threads would need gigabytes of stack; tasks need kilobytes",
        "Blocking calls inside async tasks stall the worker; use spawn_blocking",
    ]);
    Ok(())
}
