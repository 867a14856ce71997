// SPDX-License-Identifier: GPL-3.0-only

use anyhow::{Context, Result};
use tracing::{debug, info};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install a global tracing subscriber for hosts that do not bring their own.
///
/// Logs go to stderr and, if available, to the systemd journal. `RUST_LOG`
/// overrides the default filter.
pub fn init_logger() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if cfg!(debug_assertions) {
            "info,tab_backend=debug"
        } else {
            "warn,tab_backend=info"
        })
    });
    let journald = tracing_journald::layer().ok();

    tracing_subscriber::registry()
        .with(fmt::layer().compact())
        .with(journald)
        .with(filter)
        .try_init()
        .context("Failed to install the global tracing subscriber")?;
    log_panics::init();

    info!("Version: {}", std::env!("CARGO_PKG_VERSION"));
    debug!(
        "Build ({})",
        std::option_env!("GIT_HASH").unwrap_or("Unknown")
    );

    Ok(())
}
