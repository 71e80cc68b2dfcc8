use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Initialize the tracing system
///
/// Honours `RUST_LOG`, defaulting to `info`, and writes compact lines to
/// stderr.
pub fn init() -> Result<(), Box<dyn std::error::Error + Send + Sync + 'static>> {
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .compact()
        .with_target(false)
        .with_thread_ids(false)
        .with_level(true);

    tracing_subscriber::registry()
        .with(env_filter())
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}

/// Route tracing output through the test harness' captured writer.
///
/// Idempotent: the first call in a process installs the subscriber and later
/// calls find one already set and return without changing it. Integration
/// tests in other crates call this, so it is not gated on `cfg(test)`.
pub fn init_test() {
    tracing_subscriber::registry()
        .with(env_filter())
        .with(fmt::layer().with_test_writer().compact())
        .try_init()
        .ok();
}
