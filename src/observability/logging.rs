//! Structured logging initialization.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::RunMode;

/// Initialize the tracing subscriber.
///
/// Debug mode keeps ANSI colors and verbose per-request logging;
/// release mode disables colors and drops to info level. `RUST_LOG`
/// overrides the default filter either way.
pub fn init(mode: RunMode) {
    let default_filter = if mode.is_debug() {
        "portico=debug,tower_http=debug"
    } else {
        "portico=info"
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(tracing_subscriber::fmt::layer().with_ansi(mode.is_debug()))
        .init();
}
