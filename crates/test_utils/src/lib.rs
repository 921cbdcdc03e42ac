//! Test Utilities Crate
//!
//! Provides shared test infrastructure, fixtures, and helpers for the
//! model validation test suite.
//!
//! # Modules
//!
//! - `fixtures`: Pre-built, valid instances of the party and claim models
//! - `assertions`: Assertion helpers for validation results and messages
//! - `generators`: Property-based test data generators

pub mod assertions;
pub mod fixtures;
pub mod generators;

pub use assertions::*;
pub use fixtures::*;
pub use generators::*;

use std::sync::Once;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

static TRACING: Once = Once::new();

/// Installs a test-friendly tracing subscriber driven by `RUST_LOG`
///
/// Safe to call from every test; only the first call installs anything.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_test_writer().with_target(true))
            .try_init();
    });
}
