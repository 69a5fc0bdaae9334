//! Lab 9: Background Tasks
//! An auto-saver that runs beside the user and stops when told to
//!
//! Run with: cargo run --bin lab_09_background_save

use std::sync::{Arc, RwLock};
use std::thread;
use std::time::Duration;

use anyhow::Result;
use thread_labs::background::BackgroundTask;
use thread_labs::{report, telemetry};

fn main() -> Result<()> {
    telemetry::init();
    report::banner("Background Task Lab");

    // Shared memory: the user writes, the auto-saver reads.
    let document = Arc::new(RwLock::new(String::new()));

    let saver = {
        let document = Arc::clone(&document);
        BackgroundTask::spawn("auto-saver", Duration::from_secs(1), move |n| {
            let snapshot = document.read().unwrap_or_else(|e| e.into_inner()).clone();
            let shown = if snapshot.is_empty() {
                "<empty>".to_string()
            } else {
                snapshot.trim().replace('\n', " | ")
            };
            println!("[Auto-Saver] save #{n}: {shown}");
        })?
    };
    println!("[Main] auto-saver started, saving every second");

    println!("[User] starting to type...");
    for i in 1..=5 {
        let line = format!("Line {i}\n");
        document
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .push_str(&line);
        println!("[User] typing: {}", line.trim());
        thread::sleep(Duration::from_millis(600));
    }

    println!("\n[User] done typing.");
    println!("Final document:\n{}", document.read().unwrap_or_else(|e| e.into_inner()));

    let saves = saver.stop();
    println!("[Main] auto-saver stopped after {saves} saves");

    report::key_points(&[
        "The saver outlives the typing loop but not the program",
        "Stopping is explicit: a cancel token wakes the saver from its sleep",
        "Dropping the BackgroundTask handle also cancels and joins it",
        "RwLock lets the saver read while no one is writing",
    ]);
    Ok(())
}
