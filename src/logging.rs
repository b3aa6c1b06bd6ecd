//! Structured logging setup for the CLI binary, grounded in the `EnvFilter`
//! + `tracing_subscriber::fmt` pattern the teletext viewer uses for its
//! non-interactive runs, simplified here to a single stdout layer since the
//! engine has no daemon mode to route around.

use tracing_subscriber::{fmt, EnvFilter};

/// Install the global tracing subscriber. `verbose` raises the default
/// filter from `info` to `debug` when no `RUST_LOG` override is present.
pub fn init(verbose: bool) {
    let default_directive = if verbose { "rotation_core=debug" } else { "rotation_core=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .ok();
}
