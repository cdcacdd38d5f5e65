//! Test Utilities Crate
//!
//! Provides shared test infrastructure, fixtures, and helpers for the
//! fee engine test suite.
//!
//! # Modules
//!
//! - `fixtures`: Pre-built rules and an in-memory rule repository
//! - `builders`: Builder patterns for test data construction
//! - `assertions`: Custom assertion helpers for domain types
//! - `generators`: Property-based test data generators

pub mod fixtures;
pub mod builders;
pub mod assertions;
pub mod generators;

pub use fixtures::*;
pub use builders::*;
pub use assertions::*;
pub use generators::*;

use once_cell::sync::OnceCell;

static LOGGING: OnceCell<()> = OnceCell::new();

/// Installs a test subscriber once per process.
///
/// Output goes through the test writer, so it only shows for failing tests
/// or under `--nocapture`. Respects `RUST_LOG`.
pub fn init_test_logging() {
    LOGGING.get_or_init(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}
