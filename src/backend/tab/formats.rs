// SPDX-License-Identifier: GPL-3.0-only

use smithay::backend::allocator::{Format, Fourcc, Modifier};

/// Formats most EGL implementations can render to, used when no hardware
/// backend told us better.
const FALLBACK_FORMATS: [Fourcc; 16] = [
    Fourcc::Xrgb8888,
    Fourcc::Xbgr8888,
    Fourcc::Rgbx8888,
    Fourcc::Bgrx8888,
    Fourcc::Argb8888,
    Fourcc::Abgr8888,
    Fourcc::Rgba8888,
    Fourcc::Bgra8888,
    Fourcc::Xrgb2101010,
    Fourcc::Xbgr2101010,
    Fourcc::Rgbx1010102,
    Fourcc::Bgrx1010102,
    Fourcc::Argb2101010,
    Fourcc::Abgr2101010,
    Fourcc::Rgba1010102,
    Fourcc::Bgra1010102,
];

pub fn fallback_formats() -> Vec<Format> {
    FALLBACK_FORMATS
        .iter()
        .map(|&code| Format {
            code,
            modifier: Modifier::Linear,
        })
        .collect()
}
