//! Tracing subscriber for binaries and tests.
//!
//! The library crates only emit `tracing` events; nothing is printed until
//! a subscriber is installed.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install a formatting subscriber filtered by `RUST_LOG`, falling back to
/// `default_level` (e.g. `"info"` or `"ck_termstructures=debug"`).
///
/// Returns `false` when a global subscriber was already installed, which
/// makes the call safe to repeat from several tests.
pub fn init_tracing(default_level: &str) -> bool {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with(tracing_subscriber::fmt::layer())
        .try_init()
        .is_ok()
}
