use tracing_subscriber::EnvFilter;

/// Installs the process-wide tracing subscriber.
///
/// The filter comes from `RUST_LOG` and falls back to `info`. Calling this
/// again after a subscriber is installed does nothing.
pub fn setup_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
