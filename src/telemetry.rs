//! Logging setup
//!
//! Logs go to stderr so `--json` output on stdout stays machine readable.
//! `RUST_LOG` overrides the configured level when set.

use anyhow::{Context, Result};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::LoggingConfig;

/// Directive used when `RUST_LOG` is absent
fn default_directive(config: &LoggingConfig, verbose: bool) -> String {
    let level = if verbose { "debug" } else { config.level.as_str() };
    format!("{level},hyper_util=warn,reqwest=warn")
}

/// Install the global subscriber. Fails if one is already installed.
pub fn init(config: &LoggingConfig, verbose: bool) -> Result<()> {
    let directive = default_directive(config, verbose);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive));
    let registry = tracing_subscriber::registry().with(filter);

    match config.format.as_str() {
        "json" => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init(),
        _ => registry
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .try_init(),
    }
    .context("Failed to install tracing subscriber")
}
