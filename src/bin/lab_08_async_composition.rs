//! Lab 8: Async Composition
//! Fetch a flight and a hotel at the same time, then combine them
//!
//! Run with: cargo run --bin lab_08_async_composition

use std::thread;
use std::time::{Duration, Instant};

use anyhow::Result;
use colored::Colorize;
use thread_labs::{report, telemetry};

const LOOKUP_TIME: Duration = Duration::from_secs(2);

/// Blocking lookups, as a legacy client library would expose them.
fn fetch_flight(destination: &str) -> String {
    println!(
        "[Flight Service] searching flights to {destination} on {}",
        thread::current().name().unwrap_or("?")
    );
    thread::sleep(LOOKUP_TIME);
    let result = format!("Flight to {destination}");
    println!("[Flight Service] finished: {result}");
    result
}

fn fetch_hotel(destination: &str) -> String {
    println!(
        "[Hotel Service] searching hotels in {destination} on {}",
        thread::current().name().unwrap_or("?")
    );
    thread::sleep(LOOKUP_TIME);
    let result = format!("Hotel in {destination}");
    println!("[Hotel Service] finished: {result}");
    result
}

async fn plan_trip(destination: &'static str) -> Result<String> {
    // spawn_blocking moves blocking calls off the async worker threads.
    let flight = tokio::task::spawn_blocking(move || fetch_flight(destination));
    let hotel = tokio::task::spawn_blocking(move || fetch_hotel(destination));
    println!("Main: both lookups started, doing other work...");

    tokio::time::sleep(Duration::from_millis(300)).await;
    println!("Main: updated the itinerary page");
    tokio::time::sleep(Duration::from_millis(300)).await;
    println!("Main: checked loyalty points");

    let (flight, hotel) = tokio::try_join!(flight, hotel)?;
    println!("[Combiner] merging results");
    Ok(format!("Trip: {flight} + {hotel}"))
}

#[tokio::main]
async fn main() -> Result<()> {
    telemetry::init();
    report::banner("Async Composition Lab");

    let start = Instant::now();
    let trip = plan_trip("Paris").await?;
    let total = start.elapsed();

    report::section("Result");
    println!("{}", trip.green());
    println!("Total time: {} ms", report::millis(total));

    let sequential = LOOKUP_TIME * 2;
    println!("Sequential would take: {} ms", report::millis(sequential));
    println!(
        "Speedup factor: {:.2}x",
        report::speedup(sequential, total)
    );

    report::key_points(&[
        "Both lookups start before either result is needed",
        "try_join! waits for both and fails fast if either fails",
        "Blocking code belongs on spawn_blocking, not on async worker threads",
        "Total time is the slower lookup, not the sum",
    ]);
    Ok(())
}
