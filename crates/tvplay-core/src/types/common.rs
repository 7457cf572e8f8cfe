//! Common types shared across the workspace.

use serde::{Deserialize, Serialize};

/// Opaque handle to the surface an engine renders into.
///
/// The facade never inspects it; platform bindings map it back to their own view.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct RenderTarget(pub u64);

impl RenderTarget {
    pub const fn new(handle: u64) -> Self {
        Self(handle)
    }

    pub const fn handle(&self) -> u64 {
        self.0
    }
}

/// Decoded video dimensions in pixels.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct VideoSize {
    pub width: u32,
    pub height: u32,
}

impl VideoSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Format as `W x H`.
    pub fn text(&self) -> String {
        format!("{} x {}", self.width, self.height)
    }
}

/// Format a millisecond timestamp as MM:SS or H:MM:SS, rounding to the nearest second.
pub fn format_time(millis: i64) -> String {
    let prefix = if millis < 0 { "-" } else { "" };
    let total_secs = (millis.unsigned_abs() + 500) / 1000;
    let hours = total_secs / 3600;
    let minutes = (total_secs / 60) % 60;
    let seconds = total_secs % 60;

    if hours > 0 {
        format!("{prefix}{hours}:{minutes:02}:{seconds:02}")
    } else {
        format!("{prefix}{minutes:02}:{seconds:02}")
    }
}
