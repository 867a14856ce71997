// SPDX-License-Identifier: GPL-3.0-only

use crate::utils::env::{parse_bool, parse_u64};
use anyhow::{Context, Result};
use std::{
    fs::OpenOptions,
    path::{Path, PathBuf},
};
pub use tab_backend_config::TabConfig;
use tracing::{debug, info, warn};

const WAKE_INTERVAL_VAR: &str = "TAB_BACKEND_WAKE_US";
const TRACE_INPUT_VAR: &str = "TAB_BACKEND_TRACE_INPUT";

/// Load the configuration from the first config file found, falling back to
/// defaults, and apply environment overrides on top.
pub fn load() -> TabConfig {
    let xdg = xdg::BaseDirectories::new().ok();
    let mut config = load_file(xdg.as_ref());
    apply_env(&mut config);
    config
}

fn locations(xdg: Option<&xdg::BaseDirectories>) -> Vec<PathBuf> {
    let mut locations = if let Some(base) = xdg {
        vec![
            base.get_config_file("tab-backend.ron"),
            base.get_config_file("tab-backend/config.ron"),
        ]
    } else {
        Vec::with_capacity(1)
    };
    locations.push(PathBuf::from("/etc/tab-backend.ron"));
    locations
}

fn load_file(xdg: Option<&xdg::BaseDirectories>) -> TabConfig {
    for path in locations(xdg) {
        debug!("Trying config location: {}", path.display());
        if path.exists() {
            info!("Using config at {}", path.display());
            match read(&path) {
                Ok(config) => return config,
                Err(err) => {
                    warn!(?err, "Malformed config file, using defaults");
                    break;
                }
            }
        }
    }

    TabConfig::default()
}

fn read(path: &Path) -> Result<TabConfig> {
    let file = OpenOptions::new()
        .read(true)
        .open(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;
    ron::de::from_reader(file).with_context(|| format!("Failed to parse {}", path.display()))
}

pub fn parse(config: &str) -> Result<TabConfig> {
    ron::from_str(config).context("Failed to parse config")
}

fn apply_env(config: &mut TabConfig) {
    apply_overrides(config, |name| std::env::var(name).ok());
}

fn apply_overrides(config: &mut TabConfig, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(interval) = lookup(WAKE_INTERVAL_VAR).as_deref().and_then(parse_u64) {
        config.wake_interval_us = interval;
    }
    if let Some(trace) = lookup(TRACE_INPUT_VAR) {
        config.trace_input = parse_bool(&trace);
    }
}

/// The session credential: `token` if set, else the variable named by
/// `token_env`. Empty values count as missing.
pub fn session_token(config: &TabConfig) -> Option<String> {
    session_token_with(config, |name| std::env::var(name).ok())
}

fn session_token_with(
    config: &TabConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> Option<String> {
    let present = |token: &String| !token.is_empty();
    config
        .token
        .clone()
        .filter(present)
        .or_else(|| lookup(&config.token_env).filter(present))
}
