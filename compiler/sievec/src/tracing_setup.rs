//! Tracing subscriber for the `sieve` binary.

use std::sync::Once;

/// Environment variable holding the `EnvFilter` directives.
pub(crate) const LOG_ENV: &str = "SIEVE_LOG";

static TRACING_INIT: Once = Once::new();

/// Install the global subscriber.
///
/// Nothing is installed unless `SIEVE_LOG` is set, e.g.
/// `SIEVE_LOG=sieve_collect=debug,sieve_codegen=trace`. Spans render as an
/// indented tree on stderr, so a per-method lowering failure shows up under
/// the phase that produced it.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::prelude::*;
        use tracing_subscriber::EnvFilter;

        if std::env::var_os(LOG_ENV).is_none() {
            return;
        }
        let tree = tracing_tree::HierarchicalLayer::new(2)
            .with_targets(true)
            .with_bracketed_fields(true);
        tracing_subscriber::registry()
            .with(tree)
            .with(EnvFilter::from_env(LOG_ENV))
            .init();
    });
}
