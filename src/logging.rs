use tracing_subscriber::EnvFilter;

/// Diagnostics go to stderr so they never interleave with the transcript.
/// Honors RUST_LOG, defaulting to warn.
pub fn init() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
