//! Error types shared by the pool, its handles and the configuration loader.

use std::any::Any;
use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

// =============================================================================
// Pool errors
// =============================================================================

/// Why a submission was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// `shutdown_*` has been called on the pool.
    ShuttingDown,
    /// The queue is bounded and already holds `capacity` tasks.
    QueueFull { capacity: usize },
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectReason::ShuttingDown => write!(f, "pool is shutting down"),
            RejectReason::QueueFull { capacity } => {
                write!(f, "task queue is full (capacity {capacity})")
            }
        }
    }
}

#[derive(Error, Debug, Clone)]
pub enum PoolError {
    #[error("submission rejected: {reason}")]
    RejectedSubmission { reason: RejectReason },

    #[error("task failed: {0}")]
    TaskFailed(#[source] TaskError),

    #[error("no result after waiting {waited:?}")]
    AwaitTimeout { waited: Duration },

    #[error("shutdown did not finish within {timeout:?} ({unfinished} tasks unfinished)")]
    ShutdownTimeout { timeout: Duration, unfinished: usize },

    #[error("task was discarded by a forced shutdown before it ran")]
    TaskDiscarded,
}

impl PoolError {
    pub fn rejected(reason: RejectReason) -> Self {
        Self::RejectedSubmission { reason }
    }

    /// The original cause when this is a `TaskFailed`.
    pub fn task_error(&self) -> Option<&TaskError> {
        match self {
            PoolError::TaskFailed(err) => Some(err),
            _ => None,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, PoolError::AwaitTimeout { .. } | PoolError::ShutdownTimeout { .. })
    }
}

// =============================================================================
// Task failures
// =============================================================================

/// A failure raised by a task, shared by every reader of its handle.
///
/// The original error is kept behind an `Arc` so the same cause can be handed
/// to any number of `wait()` callers and still be downcast to its real type.
#[derive(Clone)]
pub struct TaskError {
    cause: Arc<dyn StdError + Send + Sync + 'static>,
}

impl TaskError {
    pub fn new<E>(cause: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self {
            cause: Arc::new(cause),
        }
    }

    pub(crate) fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "non-string panic payload".to_string()
        };
        Self::new(TaskPanicked { message })
    }

    pub fn cause(&self) -> &(dyn StdError + Send + Sync + 'static) {
        &*self.cause
    }

    pub fn downcast_ref<E: StdError + 'static>(&self) -> Option<&E> {
        self.cause.downcast_ref::<E>()
    }

    pub fn is_panic(&self) -> bool {
        self.downcast_ref::<TaskPanicked>().is_some()
    }
}

impl fmt::Debug for TaskError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TaskError").field(&self.cause).finish()
    }
}

impl fmt::Display for TaskError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.cause, f)
    }
}

impl StdError for TaskError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        Some(&*self.cause)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("task panicked: {message}")]
pub struct TaskPanicked {
    pub message: String,
}

/// Returned by interruptible operations once the running worker was told to stop.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("interrupted by forced shutdown")]
pub struct Interrupted;

// =============================================================================
// Configuration errors
// =============================================================================

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse pool config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

/// Failure to bring a pool up.
#[derive(Error, Debug)]
pub enum BuildError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to spawn worker {index}: {source}")]
    Spawn {
        index: usize,
        #[source]
        source: std::io::Error,
    },
}

impl ConfigError {
    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            reason: reason.into(),
        }
    }
}
