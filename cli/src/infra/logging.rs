//! Diagnostic logging setup.
//!
//! Operator-facing output goes through `OutputContext`; this only wires the
//! `tracing` events of the runner, executors and artifact server to stderr.

use tracing_subscriber::EnvFilter;

/// Default filter directive, raised to `debug` by `--verbose`.
#[must_use]
pub fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "movpn_cli=debug"
    } else {
        "movpn_cli=warn"
    }
}

/// Install the global subscriber. `RUST_LOG` takes precedence.
pub fn init(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));
    // A second init (tests) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
