//! Logging setup for experiment runs.
//!
//! The library only emits `tracing` events: `info` when an experiment starts
//! and ends, `debug` at every checkpoint and `trace` for every replication.
//! Binaries install a subscriber with [`init_logging`]; `RUST_LOG` takes
//! precedence over the level passed in, e.g.
//!
//! ```bash
//! RUST_LOG=queueflow::analyzer=debug queueflow --config experiment.yaml
//! ```

use tracing_subscriber::{filter::EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Installs a formatted subscriber writing to stderr at `level`
/// ("trace", "debug", "info", "warn" or "error").
///
/// Does nothing if a global subscriber is already set.
pub fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("{}={}", env!("CARGO_CRATE_NAME"), level).into());

    let _ = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_level(true),
        )
        .with(filter)
        .try_init();
}
