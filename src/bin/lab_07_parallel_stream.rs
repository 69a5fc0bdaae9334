//! Lab 7: Data Parallelism
//! Sequential iterator vs. rayon's parallel iterator
//!
//! Run with: cargo run --release --bin lab_07_parallel_stream

use anyhow::Result;
use colored::Colorize;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use thread_labs::{report, telemetry};

const ELEMENTS: usize = 10_000_000;

fn heavy(n: u32) -> f64 {
    (n as f64).sqrt().sin()
}

fn main() -> Result<()> {
    telemetry::init();
    report::banner("Parallel Iterator Lab");

    let cores = num_cpus::get();
    println!("Available CPU cores: {cores}");
    println!("Rayon worker threads: {}\n", rayon::current_num_threads());

    // Fixed seed for reproducible input.
    let mut rng = StdRng::seed_from_u64(42);
    let numbers: Vec<u32> = (0..ELEMENTS).map(|_| rng.gen_range(0..1000)).collect();
    println!("Generated {ELEMENTS} random numbers; computing sin(sqrt(n)) for each\n");

    let (sequential, sequential_time) =
        report::timed(|| numbers.iter().map(|&n| heavy(n)).collect::<Vec<_>>());
    println!("Sequential: {} ms", report::millis(sequential_time));

    let (parallel, parallel_time) =
        report::timed(|| numbers.par_iter().map(|&n| heavy(n)).collect::<Vec<_>>());
    println!("Parallel:   {} ms", report::millis(parallel_time));

    // collect() on an indexed parallel iterator preserves order.
    if sequential == parallel {
        report::success("Sequential and parallel results match element for element");
    } else {
        report::warning("Results differ!");
    }

    let speedup = report::speedup(sequential_time, parallel_time);
    report::section("Performance Analysis");
    println!("Speedup factor: {}", format!("{speedup:.2}x").green());
    println!(
        "Efficiency:     {:.1}% (of ideal {cores}x speedup)",
        report::efficiency(speedup, cores)
    );

    report::key_points(&[
        "par_iter() splits the input across a work-stealing thread pool",
        "CPU-bound speedup is capped by the number of cores",
        "Splitting and merging cost something; tiny inputs may get slower",
        "Indexed parallel collect keeps the original order",
    ]);
    Ok(())
}
