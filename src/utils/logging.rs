//! Diagnostic logging through tracing

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Log level for a `-v` count: warn, info, then debug.
pub fn level_for(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    }
}

/// Install the global subscriber, writing to stderr so stdout stays clean
/// for the report and `--json` output. A second call is a no-op.
pub fn init_logging(verbosity: u8) {
    let filter = EnvFilter::new(level_for(verbosity));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .try_init();
}
