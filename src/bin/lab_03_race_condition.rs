//! Lab 3: Race Conditions
//! Lost updates on a shared counter, and two ways to fix them
//!
//! Run with: cargo run --bin lab_03_race_condition --features racy-counter

use anyhow::Result;
use colored::Colorize;
use thread_labs::counter::{hammer, AtomicCounter, Counter, HammerReport, MutexCounter};
use thread_labs::{report, telemetry};

const THREADS: usize = 2;
const ITERATIONS: u64 = 10_000;

fn print_report(label: &str, result: HammerReport) {
    println!("{}", label.bold());
    println!("  Expected count: {}", result.expected);
    println!("  Actual count:   {}", result.actual);
    println!("  Difference:     {}", result.lost());
}

fn run<C: Counter>(label: &str, counter: &C) -> HammerReport {
    let result = hammer(counter, THREADS, ITERATIONS);
    print_report(label, result);
    result
}

#[cfg(feature = "racy-counter")]
fn racy_counter() {
    use thread_labs::counter::LostUpdateCounter;

    let result = run("Unsynchronized read-modify-write", &LostUpdateCounter::new());
    if result.is_exact() {
        report::warning("No race this time (lucky!). Run again to see lost updates.");
    } else {
        println!("{}", "✓ RACE CONDITION DETECTED!".red().bold());
        println!("  Two threads read the same value and both wrote value + 1.");
    }
}

#[cfg(not(feature = "racy-counter"))]
fn racy_counter() {
    report::warning("The unsynchronized counter is compiled out.");
    println!("  Rebuild with `--features racy-counter` to watch updates get lost.");
}

fn main() -> Result<()> {
    telemetry::init();
    report::banner("Race Condition Lab");
    println!(
        "{THREADS} threads each increment a shared counter {ITERATIONS} times.\n"
    );

    racy_counter();
    println!();

    let mutex = run("Mutex<u64>", &MutexCounter::new());
    let atomic = run("AtomicU64::fetch_add", &AtomicCounter::new());
    if mutex.is_exact() && atomic.is_exact() {
        report::success("Synchronized counters never lose an increment");
    }

    report::key_points(&[
        "count += 1 is read -> modify -> write; threads can interleave between steps",
        "A Mutex makes the whole sequence exclusive",
        "An atomic fetch_add performs it as one indivisible operation",
        "Safe Rust rejects plain shared mutation at compile time; the racy demo opts in explicitly",
    ]);
    Ok(())
}
