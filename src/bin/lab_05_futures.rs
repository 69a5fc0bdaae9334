//! Lab 5: Futures
//! Order tickets from a two-chef kitchen
//!
//! Run with: cargo run --bin lab_05_futures

use std::thread;
use std::time::Duration;

use anyhow::Result;
use colored::Colorize;
use thread_labs::{interrupt, report, telemetry, Interrupted, PoolError, TaskHandle, WorkerPool};

#[derive(thiserror::Error, Debug)]
enum KitchenError {
    #[error("{0} preparation was interrupted")]
    Interrupted(String),
    #[error("we are out of {0}")]
    OutOfStock(String),
}

fn make_food(pool: &WorkerPool, food: &'static str) -> Result<TaskHandle<String>, PoolError> {
    pool.submit_fallible(move || {
        println!(
            "Kitchen: preparing {food} on {}",
            thread::current().name().unwrap_or("?")
        );
        if food == "Tiramisu" {
            return Err(KitchenError::OutOfStock(food.to_string()));
        }
        interrupt::sleep(Duration::from_secs(2))
            .map_err(|Interrupted| KitchenError::Interrupted(food.to_string()))?;
        println!("Kitchen: finished preparing {food}");
        Ok(format!("Ready: {food}"))
    })
}

fn main() -> Result<()> {
    telemetry::init();
    report::banner("Future & Handle Lab");
    println!("Main: opening kitchen with 2 chefs (threads)...\n");
    let pool = WorkerPool::new(2)?;

    println!("Main: placing orders...");
    let pizza = make_food(&pool, "Pizza")?;
    let pasta = make_food(&pool, "Pasta")?;
    println!("Main: received tickets {} and {} immediately", pizza.id(), pasta.id());

    for chore in ["Checked on customers", "Cleaned some tables", "Restocked supplies"] {
        thread::sleep(Duration::from_millis(500));
        println!("Main: {chore}...");
    }

    println!("\nMain: is the pizza ready? {}", pizza.is_done());
    match pizza.wait_timeout(Duration::ZERO) {
        Err(err @ PoolError::AwaitTimeout { .. }) => println!("Main: peeking failed: {err}"),
        other => println!("Main: early peek -> {other:?}"),
    }

    println!("Main: now waiting for the food (wait() blocks)\n");
    println!("Main: received -> {}", pizza.wait()?.green());
    println!("Main: received -> {}", pasta.wait()?.green());

    report::section("A ticket that fails");
    let dessert = make_food(&pool, "Tiramisu")?;
    match dessert.wait() {
        Ok(food) => println!("Main: received -> {food}"),
        Err(err) => {
            println!("Main: {}", err.to_string().red());
            if let Some(KitchenError::OutOfStock(item)) =
                err.task_error().and_then(|cause| cause.downcast_ref::<KitchenError>())
            {
                println!("Main: the original cause is still there: out of {item}");
            }
        }
    }
    // The pool is unaffected by the failed order.
    let coffee = pool.submit(|| "Ready: Coffee".to_string())?;
    println!("Main: received -> {}", coffee.wait()?.green());

    if pool.shutdown_graceful(Duration::from_secs(3)).is_err() {
        println!("Forcing shutdown...");
        pool.shutdown_now();
    }

    report::key_points(&[
        "submit() returns a handle immediately; the work happens on a worker",
        "wait() blocks until the result exists; wait_timeout() gives up without cancelling",
        "A failing task resolves its handle with TaskFailed and the original cause",
        "Every clone of a handle sees the same result; the task runs once",
    ]);
    Ok(())
}
