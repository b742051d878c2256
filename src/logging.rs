use tracing_subscriber::EnvFilter;

/// Initialise logging. The level is `info` unless the settings file enables
/// debug logging, in which case `RUST_LOG` may override the default `debug`.
pub fn init(debug: bool) {
    let level = if debug { "debug" } else { "info" };

    // With debug logging off the filter is pinned so a stray `RUST_LOG` in
    // the environment cannot make the overlay chatty.
    let filter = if debug {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
    } else {
        EnvFilter::new(level)
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init();
}
