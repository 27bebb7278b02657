use tracing_subscriber::filter::EnvFilter;

const LOG_ENV: &str = "FAIRWINDOW_LOG";

/// Install the stderr subscriber.
///
/// The filter comes from `FAIRWINDOW_LOG`, then `RUST_LOG`, then `warn`.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    // Ignore a second initialization; the first subscriber stays active.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
