//! Tracing initialization.

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Environment variable holding the log filter.
pub const LOG_ENV_VAR: &str = "KRILL_LOG";

static INIT: Once = Once::new();

/// Initialize the krill tracing/logging system.
///
/// Reads `KRILL_LOG` for per-module log levels, e.g.
/// `KRILL_LOG=krill_core::extract=debug,krill_core::index=warn`.
/// Falls back to `krill_core=info` if `KRILL_LOG` is unset or invalid.
///
/// Idempotent. If the host already installed a global subscriber, that one
/// stays in place.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
            .unwrap_or_else(|_| EnvFilter::new("krill_core=info"));

        let _ = tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true),
            )
            .with(filter)
            .try_init();
    });
}
