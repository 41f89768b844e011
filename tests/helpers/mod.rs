//! Shared fixtures for integration tests.

pub mod affinity;
pub mod fixtures;

use tracing_subscriber::EnvFilter;

/// Route `tracing` output to the test harness; `RUST_LOG` selects levels.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
