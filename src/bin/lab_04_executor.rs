//! Lab 4: Thread Pools
//! Ten tasks, three reusable workers
//!
//! Run with: cargo run --bin lab_04_executor

use std::thread;
use std::time::Duration;

use anyhow::Result;
use crossbeam::channel;
use itertools::Itertools;
use thread_labs::{interrupt, report, telemetry, PoolConfig, WorkerPool};

const WORKERS: usize = 3;
const TASKS: usize = 10;

fn main() -> Result<()> {
    telemetry::init();
    report::banner("Worker Pool Lab");

    let config = PoolConfig::with_workers(WORKERS)
        .thread_name_prefix("pool-thread")
        .with_env_overrides()?;
    let pool = WorkerPool::with_config(config)?;
    println!("Created a pool with {} worker threads", pool.workers());
    println!("Submitting {TASKS} tasks...\n");

    let (tx, rx) = channel::unbounded::<(usize, String)>();
    let (outcome, elapsed) = report::timed(|| -> Result<()> {
        for task_id in 1..=TASKS {
            let tx = tx.clone();
            pool.execute(move || {
                let worker = thread::current().name().unwrap_or("?").to_string();
                println!("Task [{task_id}] started by {worker}");
                if interrupt::sleep(Duration::from_millis(500)).is_err() {
                    eprintln!("Task [{task_id}] was interrupted!");
                    return;
                }
                println!("Task [{task_id}] finished.");
                let _ = tx.send((task_id, worker));
            })?;
        }
        println!("\nAll {TASKS} tasks submitted; only {} threads will run them.\n", pool.workers());

        match pool.shutdown_graceful(pool.config().shutdown_timeout()) {
            Ok(()) => report::success("All tasks completed"),
            Err(err) => {
                report::warning(&format!("{err}; forcing shutdown"));
                let discarded = pool.shutdown_now();
                println!("Discarded {} queued tasks", discarded.len());
            }
        }
        println!("Pool shut down: {}", pool.is_shutdown());
        Ok(())
    });
    drop(tx);
    outcome?;

    let per_worker = rx.iter().map(|(_, worker)| worker).counts();
    report::section("Who ran what");
    for (worker, count) in per_worker.iter().sorted() {
        println!("{worker}: {count} tasks");
    }
    println!("Total time: {} ms (sequential would be ~{} ms)", report::millis(elapsed), TASKS * 500);

    report::key_points(&[
        "Only the pool's threads appear: threads are reused, not created per task",
        "At most one task per worker runs at a time; the rest wait in the queue",
        "shutdown_graceful stops new submissions and lets queued work finish",
        "shutdown_now interrupts running tasks and hands back the queued ones",
    ]);
    Ok(())
}
