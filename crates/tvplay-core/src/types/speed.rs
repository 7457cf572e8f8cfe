//! Playback speed steps.

/// Slowest step in the speed cycle.
pub const MIN_SPEED: f32 = 0.25;

/// Fastest step in the speed cycle.
pub const MAX_SPEED: f32 = 5.0;

pub const NORMAL_SPEED: f32 = 1.0;

/// Speed `toggle_speed` jumps to from normal speed.
const FAST_SPEED: f32 = 3.0;

fn same(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-4
}

/// Next step in the speed cycle.
///
/// Steps by 0.25 below 2x and by 1.0 from 2x up, wrapping to the minimum
/// once the maximum is reached.
pub fn cycle_speed(speed: f32) -> f32 {
    if speed >= MAX_SPEED || same(speed, MAX_SPEED) {
        return MIN_SPEED;
    }
    let step = if speed >= 2.0 { 1.0 } else { 0.25 };
    (speed + step).min(MAX_SPEED)
}

/// Flip between normal and fast playback.
pub fn toggle_speed(speed: f32) -> f32 {
    if same(speed, NORMAL_SPEED) {
        FAST_SPEED
    } else {
        NORMAL_SPEED
    }
}

/// Format a speed with two decimals.
pub fn format_speed(speed: f32) -> String {
    format!("{speed:.2}")
}
