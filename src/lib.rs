//! # Thread Labs
//!
//! Small, self-contained programs that each demonstrate one concurrency
//! primitive, built on a shared library:
//!
//! - [`pool`]: bounded worker pool with future-based task submission
//! - [`handle`]: write-once/read-many task handles
//! - [`interrupt`]: cooperative interruption for forced shutdown
//! - [`background`]: cancellable background tasks
//! - [`counter`]: synchronized counters (and, behind `racy-counter`, a broken one)
//! - [`lifecycle`]: observable thread states
//!
//! Run a lab with `cargo run --bin lab_04_executor`.

pub mod background;
pub mod config;
pub mod counter;
pub mod error;
pub mod handle;
pub mod interrupt;
pub mod lifecycle;
pub mod pool;
pub mod report;
pub mod telemetry;

pub use config::PoolConfig;
pub use error::{BuildError, ConfigError, Interrupted, PoolError, RejectReason, TaskError};
pub use handle::{TaskHandle, TaskId};
pub use pool::{PendingTask, PoolState, ShutdownMode, ShutdownReport, WorkerPool, WorkerState};
