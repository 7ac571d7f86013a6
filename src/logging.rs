//! Ambient logging (component 4.K).
//!
//! The server never threads a logger callback through its call graph; every
//! component emits structured events through `tracing`, and a single
//! subscriber installed at process start serializes them to one sink.
//! Per-record atomicity across concurrent workers is the subscriber's job,
//! not ours.

use tracing_subscriber::EnvFilter;

/// Installs the global subscriber. Idempotent-safe to call once; calling it
/// twice in the same process panics, which is intentional — it signals a
/// bug in the entrypoint, not a condition worth recovering from.
pub fn init() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(true)
        .init();
}
