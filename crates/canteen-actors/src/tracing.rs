//! Tracing bootstrap shared by binaries and integration tests.

/// Initializes the `tracing` subscriber for the application.
///
/// Verbosity is controlled through the `RUST_LOG` environment variable
/// (`info`, `debug`, `canteen_admin=debug`, …). Safe to call once per
/// process; a second call would panic inside `tracing_subscriber`, so tests
/// that need logging should go through `try_init` themselves.
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();
}
