use tracing_subscriber::{filter::LevelFilter, fmt, prelude::*, EnvFilter};

/// Create a default subscriber logging diagnostics to `stderr` and respecting
/// the `RUST_LOG` environment variable.
///
/// Reports go to their own sink, so diagnostics stay off `stdout`. If the
/// environment variable is not set the "info" level is used.
pub fn init_subscriber() {
    let fmt_layer = fmt::layer().with_target(true).with_writer(std::io::stderr);

    let filter_layer = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .init();
}

/// Create a subscriber for tests.
///
/// The returned guard installs the subscriber for the current thread only, so
/// test threads do not conflict.
pub fn init_test_subscriber() -> tracing::subscriber::DefaultGuard {
    let fmt_layer = fmt::layer().with_target(true).with_test_writer();

    let filter_layer = EnvFilter::builder()
        .with_default_directive(LevelFilter::DEBUG.into())
        .from_env_lossy();

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .set_default()
}
