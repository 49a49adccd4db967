//! Logging setup for the command-line runner.
//!
//! `RUST_LOG` takes precedence. Without it, everything logs at INFO, and
//! `verbose` raises this crate to DEBUG so per-district chunk sizes and
//! under-target growth become visible.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub fn init(verbose: bool) {
    let default_directive = if verbose {
        "info,settlement_map=debug"
    } else {
        "info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true);

    // A second call (tests, embedding) keeps the first subscriber.
    let _ = tracing_subscriber::registry()
        .with(stderr_layer)
        .with(filter)
        .try_init();
}
