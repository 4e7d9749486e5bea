use tracing_subscriber::EnvFilter;

/// Install the stderr diagnostics subscriber.
///
/// `level` is an `EnvFilter` directive (`warn`, `debug`, `mldash=trace`, ...).
/// An unparsable directive falls back to `warn`. Calling this twice is a
/// no-op.
pub fn init(level: &str) {
    let filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
