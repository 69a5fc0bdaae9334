//! Tracing setup for the lab binaries.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Default filter: library warnings only, so lab narration stays readable.
/// Override with `RUST_LOG`, e.g. `RUST_LOG=thread_labs=debug`.
pub const DEFAULT_FILTER: &str = "thread_labs=warn";

pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into());
    // A second call (tests, repeated init) keeps the first subscriber.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_thread_names(true))
        .try_init();
}
