//! Diagnostics for humans, on stderr
//!
//! stdout belongs to the monitoring host: it gets exactly the status line
//! (or the samples) and nothing else.

use std::io;

use tracing_subscriber::EnvFilter;

/// Install the global subscriber
///
/// `RUST_LOG` wins when set, otherwise `verbose` picks between `debug` and
/// `warn`. Calling this twice is harmless.
pub fn init(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}
