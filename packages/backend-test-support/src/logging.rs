//! One-time tracing setup shared by every test binary.

use once_cell::sync::OnceCell;
use tracing_subscriber::{fmt, EnvFilter};

static INITIALIZED: OnceCell<()> = OnceCell::new();

/// Install a test subscriber once per process.
///
/// Filter precedence: `TEST_LOG`, then `RUST_LOG`, then `warn`.
/// Set `TEST_LOG_FORMAT=json` to get the same JSON lines the server emits.
pub fn init() {
    INITIALIZED.get_or_init(|| {
        let filter = std::env::var("TEST_LOG")
            .or_else(|_| std::env::var("RUST_LOG"))
            .map(EnvFilter::new)
            .unwrap_or_else(|_| EnvFilter::new("warn"));

        let json = std::env::var("TEST_LOG_FORMAT")
            .map(|v| v.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        let builder = fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .without_time();

        // try_init: a subscriber may already be installed by another harness
        if json {
            builder.json().try_init().ok();
        } else {
            builder.try_init().ok();
        }
    });
}
