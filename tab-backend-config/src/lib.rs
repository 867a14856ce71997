// SPDX-License-Identifier: GPL-3.0-only

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Environment variable holding the shift session token by default.
pub const DEFAULT_TOKEN_ENV: &str = "SHIFT_SESSION_TOKEN";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TabConfig {
    /// Session credential, takes precedence over `token_env` when set.
    pub token: Option<String>,
    /// Name of the environment variable the session credential is read from.
    pub token_env: String,
    /// Interval of the periodic wake source, in microseconds.
    pub wake_interval_us: u64,
    /// Advertised length of every output's buffer chain.
    pub swapchain_length: usize,
    /// Refresh rate of the single mode every output exposes, in mHz.
    pub refresh_mhz: i32,
    /// Log every translated input event at trace level.
    pub trace_input: bool,
}

impl Default for TabConfig {
    fn default() -> Self {
        Self {
            token: None,
            token_env: DEFAULT_TOKEN_ENV.to_string(),
            wake_interval_us: 1_000,
            swapchain_length: 2,
            refresh_mhz: 60_000,
            trace_input: false,
        }
    }
}

impl TabConfig {
    pub fn wake_interval(&self) -> Duration {
        // a zero interval would disarm the timer
        Duration::from_micros(self.wake_interval_us.max(1))
    }
}
