//! Tracing subscriber setup.
//!
//! Logs go to stderr: stdout carries MCP frames under `gtfo serve mcp` and
//! command output everywhere else. The filter comes from `RUST_LOG` and
//! defaults to `info`.

use tracing_subscriber::EnvFilter;

pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    // A second init (e.g. from tests) is harmless; keep the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
