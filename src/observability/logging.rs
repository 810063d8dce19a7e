//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the tracing subscriber for the binary and for tests
//!
//! # Design Decisions
//! - `RUST_LOG` wins over the default filter
//! - Initialisation is idempotent so every test may call it

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter used when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "raw_mock=debug,tower_http=debug";

/// Install a fmt subscriber. Returns false if one was already installed.
pub fn init(default_filter: &str) -> bool {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(tracing_subscriber::fmt::layer())
        .try_init()
        .is_ok()
}

/// Test-friendly variant: output goes through the test harness capture.
pub fn init_for_tests() {
    let _ = tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into()))
        .with(tracing_subscriber::fmt::layer().with_test_writer())
        .try_init();
}
