pub mod commands;
pub mod core;

use tracing_subscriber::EnvFilter;

pub use commands::Cli;

/// Install the global tracing subscriber. `RUST_LOG` overrides the default
/// filter; later calls are no-ops.
pub fn init_logging(json: bool) {
    if tracing::dispatcher::has_been_set() {
        return;
    }

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,neoforge_lock=debug"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    let _ = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
}
