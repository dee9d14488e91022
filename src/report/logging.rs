//! Tracing setup for test binaries that drive conversations.

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Output format for [`init_tracing`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Human,
    Json,
}

/// Default filter for a verbosity level.
#[must_use]
pub const fn default_filter(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn,converse=info",
        1 => "info,converse=debug",
        2 => "debug,converse=trace",
        _ => "trace",
    }
}

/// Install a global stderr subscriber. `RUST_LOG` takes precedence over
/// `verbose`. Later calls are no-ops.
pub fn init_tracing(verbose: u8, format: LogFormat) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter(verbose)));

    let result = match format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init(),
        LogFormat::Human => tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().with_writer(std::io::stderr))
            .try_init(),
    };
    // Already installed by an earlier test in the same binary.
    let _ = result;
}
