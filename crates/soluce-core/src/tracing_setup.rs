//! Tracing initialization and configuration.

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

static INIT: Once = Once::new();

/// Environment variable holding per-module log levels.
pub const LOG_ENV: &str = "SOLUCE_LOG";
pub const DEFAULT_FILTER: &str = "soluce=info";

/// Initialize the tracing/logging system.
///
/// Reads `SOLUCE_LOG` for per-module log levels, e.g.
/// `SOLUCE_LOG=soluce_gating=debug,soluce_storage=warn`.
/// Falls back to `soluce=info` if unset or invalid.
///
/// Idempotent: later calls are no-ops.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter =
            EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

        // try_init: a host application may already own the global subscriber.
        let _ = tracing_subscriber::registry()
            .with(fmt::layer().with_target(true).with_line_number(true))
            .with(filter)
            .try_init();
    });
}
