//! Shared test helpers: introspection payload builders, the schema used across the
//! test suites, and a scripted transport.

pub mod fixtures;
pub mod introspection;
pub mod transport;

/// Route log output through the test harness. Safe to call from every test.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}
