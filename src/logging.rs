use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Install the global subscriber, writing to stderr so command output stays clean.
/// An unparseable filter falls back to the default.
pub(crate) fn init(filter: &str) {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, EnvFilter};

        let env_filter = EnvFilter::try_new(filter)
            .unwrap_or_else(|_| EnvFilter::new(crate::config::DEFAULT_LOG_FILTER));

        fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .init();
    });
}
