//! Narration helpers shared by the lab binaries.

use std::time::{Duration, Instant};

use colored::Colorize;

pub fn banner(title: &str) {
    println!("{}\n", format!("=== {title} ===").bold().cyan());
}

pub fn section(title: &str) {
    println!("\n{}", format!("=== {title} ===").bold());
}

pub fn key_points(points: &[&str]) {
    section("Key Points");
    for (i, point) in points.iter().enumerate() {
        println!("{}. {}", i + 1, point);
    }
}

pub fn success(message: &str) {
    println!("{}", format!("✓ {message}").green());
}

pub fn warning(message: &str) {
    println!("{}", format!("⚠ {message}").yellow());
}

/// Runs `f` and returns its result with the elapsed wall time.
pub fn timed<T>(f: impl FnOnce() -> T) -> (T, Duration) {
    let start = Instant::now();
    let value = f();
    (value, start.elapsed())
}

/// `sequential / parallel`; zero when the parallel run took no measurable time.
pub fn speedup(sequential: Duration, parallel: Duration) -> f64 {
    if parallel.is_zero() {
        return 0.0;
    }
    sequential.as_secs_f64() / parallel.as_secs_f64()
}

/// Speedup as a percentage of the ideal (one times per core).
pub fn efficiency(speedup: f64, cores: usize) -> f64 {
    if cores == 0 {
        return 0.0;
    }
    speedup / cores as f64 * 100.0
}

pub fn millis(d: Duration) -> u128 {
    d.as_millis()
}
