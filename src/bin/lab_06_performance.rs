//! Lab 6: Sequential vs. Parallel I/O
//! Why threads help when work is mostly waiting
//!
//! Run with: cargo run --bin lab_06_performance

use std::thread;
use std::time::Duration;

use anyhow::{anyhow, Result};
use colored::Colorize;
use thread_labs::{report, telemetry, WorkerPool};

const IO_TIME: Duration = Duration::from_secs(2);

/// Stands in for a network call or disk read.
fn simulate_io(task: &str) {
    println!("{task}: waiting on I/O for {}s", IO_TIME.as_secs());
    thread::sleep(IO_TIME);
    println!("{task}: done");
}

fn sequential() -> Duration {
    report::section("Experiment A: sequential");
    let ((), elapsed) = report::timed(|| {
        simulate_io("Task 1");
        simulate_io("Task 2");
    });
    println!("Sequential time: {} ms", report::millis(elapsed));
    elapsed
}

fn raw_threads() -> Result<Duration> {
    report::section("Experiment B: one thread per task");
    let (joined, elapsed) = report::timed(|| {
        let first = thread::spawn(|| simulate_io("Task 1 (parallel)"));
        let second = thread::spawn(|| simulate_io("Task 2 (parallel)"));
        first.join().and(second.join())
    });
    joined.map_err(|_| anyhow!("an I/O thread panicked"))?;
    println!("Parallel time: {} ms", report::millis(elapsed));
    Ok(elapsed)
}

fn pooled(tasks: usize, workers: usize) -> Result<Duration> {
    report::section(&format!("Experiment C: {tasks} tasks on a {workers}-worker pool"));
    let pool = WorkerPool::new(workers)?;
    let (waited, elapsed) = report::timed(|| -> Result<()> {
        let handles = (1..=tasks)
            .map(|i| pool.execute(move || simulate_io(&format!("Pooled task {i}"))))
            .collect::<Result<Vec<_>, _>>()?;
        for handle in handles {
            handle.wait()?;
        }
        Ok(())
    });
    waited?;
    let rounds = tasks.div_ceil(workers);
    println!(
        "Pool time: {} ms ({rounds} rounds of {}s)",
        report::millis(elapsed),
        IO_TIME.as_secs()
    );
    Ok(elapsed)
}

fn main() -> Result<()> {
    telemetry::init();
    report::banner("Performance Lab: I/O-bound work");

    let sequential_time = sequential();
    thread::sleep(Duration::from_millis(500));
    let parallel_time = raw_threads()?;
    pooled(5, 2)?;

    report::section("Summary");
    println!(
        "Speedup factor: {}",
        format!("{:.2}x", report::speedup(sequential_time, parallel_time)).green()
    );
    println!("Parallel runs take as long as the slowest task, not the sum of all tasks.");

    report::key_points(&[
        "Sleeping threads use no CPU; the OS runs others meanwhile",
        "I/O-bound work scales with threads far beyond the core count",
        "A pool of N workers finishes M equal tasks in ceil(M / N) rounds",
        "CPU-bound work only scales up to the number of cores (see lab 7)",
    ]);
    Ok(())
}
