use tracing_subscriber::EnvFilter;

/// Installs the JSON log subscriber used by every handler binary.
///
/// Level comes from `RUST_LOG` and defaults to `info`. Timestamps and targets
/// are omitted since CloudWatch stamps ingestion time on every line.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_current_span(false)
        .init();
}
