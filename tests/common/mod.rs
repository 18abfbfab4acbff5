//! tests/common/mod.rs
use std::sync::Once;
use tracing_subscriber::fmt::format::FmtSpan;

/// Initializes tracing for tests, ensuring it's only done once.
pub fn init_tracing() {
    static TRACING_INIT: Once = Once::new();
    TRACING_INIT.call_once(|| {
        let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "tcp_mario=debug".to_string());
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_span_events(FmtSpan::CLOSE)
            .with_test_writer()
            .init();
    });
}
