//! Tracing subscriber setup.

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Install a `tracing` subscriber filtered by `RUST_LOG`.
///
/// Call once at startup; later calls are no-ops. Nothing is installed when
/// `RUST_LOG` is unset, so embedding applications keep control of their own
/// subscriber. Enable with `RUST_LOG=cardex_eval=debug` (folding and fallback
/// decisions) or `RUST_LOG=cardex_eval=trace` (every evaluation step).
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .init();
        }
    });
}
