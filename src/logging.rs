//! Diagnostic tracing for the interpreter.
//!
//! Events go to stderr so program output on stdout stays untouched. The
//! library only emits events; installing the subscriber is up to the binary.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize the tracing subscriber.
///
/// `RUST_LOG` wins when set. Otherwise the level is `debug` with `--debug`
/// and `warn` without it.
///
/// # Example
/// ```bash
/// RUST_LOG=bf_tree=trace bf program.bf
/// ```
pub fn init(debug: bool) {
    let fallback = if debug { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .try_init();
}
