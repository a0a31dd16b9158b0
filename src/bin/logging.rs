use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Send logs to stderr so stdout only carries the command's output.
///
/// `verbose` forces debug level, otherwise `RUST_LOG` is used, defaulting to "info".
pub fn init(verbose: bool) {
    let filter_layer = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact();
    // Only fails if a subscriber is already installed
    let _ = tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .try_init();
}
