//! Logging setup for the command-line front end.

use anyhow::Result;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter for `--verbose`. The binary's own target is its crate name, which is the
/// `[[bin]]` name rather than the package name.
pub const VERBOSE_FILTER: &str = concat!(
    "info,life_core=debug,life_world=debug,",
    env!("CARGO_CRATE_NAME"),
    "=debug"
);

pub const QUIET_FILTER: &str = "warn";

/// Logs go to stderr so renderings on stdout stay clean.
pub fn init_telemetry(verbose: bool, json: bool) -> Result<()> {
    let default_filter = if verbose { VERBOSE_FILTER } else { QUIET_FILTER };

    let json_layer = json.then(|| {
        tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
    });
    let text_layer = (!json).then(|| {
        tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_writer(std::io::stderr)
    });

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(json_layer)
        .with(text_layer)
        .try_init()?;

    debug!("Telemetry initialized");
    Ok(())
}
