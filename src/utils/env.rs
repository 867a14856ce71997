// SPDX-License-Identifier: GPL-3.0-only

pub fn parse_bool(value: &str) -> bool {
    ["1", "true", "yes", "y"].contains(&value.to_lowercase().as_str())
}

pub fn parse_u64(value: &str) -> Option<u64> {
    value.trim().parse().ok()
}
