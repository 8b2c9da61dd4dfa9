//! Tracing setup shared by the harness binary and its tests

use tracing_subscriber::{EnvFilter, fmt};

/// Initialize tracing with the given level filter (e.g. "info", "debug",
/// or a full `EnvFilter` directive like "harness=debug,info").
///
/// Safe to call more than once; later calls are no-ops, which keeps test
/// binaries from panicking when several tests initialize logging.
pub fn init_tracing(level: &str) {
    let filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .try_init();
}
