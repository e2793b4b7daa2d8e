//! Tracing setup is idempotent.

use catgate_core::tracing::init_tracing;

#[test]
fn test_init_tracing_twice() {
    init_tracing();
    init_tracing();
    tracing::info!(target: "catgate_core", "tracing initialized");
}
