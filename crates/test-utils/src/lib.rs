//! Shared helpers for the `devloop` integration tests.

pub mod builders;
pub mod sink;

use std::future::Future;
use std::sync::Once;
use std::time::Duration;

use tracing_subscriber::EnvFilter;

pub use sink::MemorySink;

/// Upper bound for any single awaited step in a test.
pub const TEST_TIMEOUT: Duration = Duration::from_secs(10);

static TRACING: Once = Once::new();

/// Route `tracing` output into the test harness.
///
/// Output is captured per test and only shown for failures (or with
/// `--nocapture`). Filter with `RUST_LOG`, e.g. `RUST_LOG=devloop=debug`.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("devloop=info"));

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    });
}

/// Await `fut`, panicking if it takes longer than [`TEST_TIMEOUT`].
pub async fn with_timeout<F: Future>(fut: F) -> F::Output {
    match tokio::time::timeout(TEST_TIMEOUT, fut).await {
        Ok(output) => output,
        Err(_) => panic!("test step timed out after {TEST_TIMEOUT:?}"),
    }
}
