//! Logging Infrastructure
//!
//! Structured logging setup for binaries and demos embedding the engine.
//! Library consumers that already install a subscriber can ignore this.

/// Initialize the logger at the default level (`info`, or `RUST_LOG`).
pub fn init_logger() {
    init_logger_with_level(None);
}

/// Initialize the logger with an explicit level.
pub fn init_logger_with_level(log_level: Option<&str>) {
    use tracing_subscriber::EnvFilter;

    let filter = match log_level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };

    // try_init: tests and embedders may have installed a subscriber already
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_target(false)
        .try_init();
}
