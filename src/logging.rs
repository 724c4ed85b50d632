use tracing_subscriber::fmt::time::ChronoUtc;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

// ── Logging ──────────────────────────────────────────────────────────────────

/// Filter directives, e.g. `IDEA_GENERATOR_LOG=ai_idea_generator_lib=debug`.
pub const ENV_LOG: &str = "IDEA_GENERATOR_LOG";

const DEFAULT_FILTER: &str = "info";

/// Install the global subscriber: human-readable lines on stderr with RFC 3339
/// timestamps. Safe to call more than once; later calls are no-ops.
pub fn init() {
    let filter = EnvFilter::try_from_env(ENV_LOG).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let result = Registry::default()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(true)
                .with_timer(ChronoUtc::rfc_3339())
                .with_writer(std::io::stderr),
        )
        .try_init();

    if result.is_err() {
        tracing::debug!("logging already initialized");
    }
}
