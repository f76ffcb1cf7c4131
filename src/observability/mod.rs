//! Logging setup for the binary.
//!
//! Library code only emits `tracing` events; the binary installs one stderr
//! subscriber so the JSON report on stdout stays clean.

use tracing_subscriber::EnvFilter;

/// Default filter for a `-v` count: warnings, then info, debug and trace.
pub fn filter_for_verbosity(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "smellmap=warn",
        1 => "smellmap=info",
        2 => "smellmap=debug",
        _ => "smellmap=trace",
    }
}

/// Installs the global subscriber. `RUST_LOG` wins over `verbosity`.
pub fn init_tracing(verbosity: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_for_verbosity(verbosity)));

    // A second call (tests, embedding) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
