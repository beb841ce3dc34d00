use tracing_subscriber::EnvFilter;

/// Initialize the tracing subscriber for structured logging.
///
/// Debug builds get human-readable output; release builds emit JSON for
/// log shipping. `RUST_LOG` controls the level, defaulting to `info`.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(true);
    if cfg!(debug_assertions) {
        builder.init();
    } else {
        builder.json().init();
    }
}
