//! Tracing subscriber setup shared by the binaries.

use tracing_subscriber::EnvFilter;

/// Initialize tracing/logging.
///
/// `RUST_LOG` wins; otherwise `default_level` from the configuration. Logs go
/// to stderr so stdout only carries the demo output.
pub fn init(default_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .init();
}
