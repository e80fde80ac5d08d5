//! Tracing subscriber setup for the binary.

use std::sync::OnceLock;

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

static INITIALISED: OnceLock<()> = OnceLock::new();

/// Environment variable holding the log filter directive.
pub const LOG_ENV: &str = "GENMODEL_LOG";

/// Install the global subscriber, writing to stderr.
///
/// The filter comes from `GENMODEL_LOG` when set, otherwise `debug` with
/// `verbose` and `warn` without. Later calls are no-ops.
pub fn init_tracing(verbose: bool) {
    if INITIALISED.set(()).is_err() {
        return;
    }

    let fallback = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(fallback));
    let fmt_layer = fmt::layer().with_target(true).with_writer(std::io::stderr);

    // Another subscriber may already be installed by an embedding process.
    let _ = Registry::default().with(filter).with(fmt_layer).try_init();
}
