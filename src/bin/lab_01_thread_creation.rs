//! Lab 1: Creating Threads
//! A named worker type vs. an inline closure
//!
//! Run with: cargo run --bin lab_01_thread_creation

use std::thread;

use anyhow::{anyhow, Result};
use thread_labs::{report, telemetry};

/// A unit of work that knows how to run itself on its own thread.
struct Greeter {
    greeting: &'static str,
}

impl Greeter {
    fn run(self) {
        println!(
            "{} from {}",
            self.greeting,
            thread::current().name().unwrap_or("<unnamed>")
        );
    }
}

fn spawn_named_worker() -> Result<thread::JoinHandle<()>> {
    let greeter = Greeter {
        greeting: "Hello from a dedicated worker type",
    };
    // Builder lets us name the thread and surfaces spawn failures as io::Error.
    let handle = thread::Builder::new()
        .name("greeter-thread".into())
        .spawn(move || greeter.run())?;
    Ok(handle)
}

fn spawn_closure() -> thread::JoinHandle<()> {
    thread::spawn(|| {
        println!(
            "Hello from a closure on {:?}",
            thread::current().id()
        );
    })
}

fn main() -> Result<()> {
    telemetry::init();
    report::banner("Thread Creation Lab");
    println!("Main thread: {}", thread::current().name().unwrap_or("<unnamed>"));

    let first = spawn_named_worker()?;
    let second = spawn_closure();

    // join() waits for the thread; Err means it panicked.
    first.join().map_err(|_| anyhow!("greeter thread panicked"))?;
    second.join().map_err(|_| anyhow!("closure thread panicked"))?;

    report::success("Both threads finished; main exits last");
    report::key_points(&[
        "thread::spawn takes any FnOnce() + Send + 'static closure",
        "thread::Builder names the thread and returns io::Result instead of panicking",
        "move closures transfer ownership of captured values into the thread",
        "join() blocks until the thread ends and reports panics as Err",
    ]);
    Ok(())
}
