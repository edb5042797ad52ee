//! Logger setup shared by every binary in the workspace.

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Initialize the global tracing subscriber.
///
/// `RUST_LOG` wins when it is set. Otherwise the binary's own target and the
/// library crates of this workspace log at `default_level`, everything else
/// at `warn`.
///
/// Calling this more than once is harmless: later calls are ignored.
pub fn setup_logger(bin_name: &str, default_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(bin_name, default_level)));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true))
        .try_init();
}

fn default_directives(bin_name: &str, default_level: &str) -> String {
    // Binary names use '-', tracing targets use the crate name with '_'.
    let bin_target = bin_name.replace('-', "_");
    format!(
        "warn,{bin_target}={default_level},serenity_dashboard={default_level},serenity_shared={default_level}"
    )
}
