// ride_core/src/dynamics/steering.rs

use crate::config::DriveConfig;
use crate::utils::math::{clamp01, lerp};

/// Highest turn rate (rad/s) available at `forward_speed`. Ramps from
/// `min_turn_rate` when stationary to `max_turn_rate` at `full_turn_speed`.
pub fn turn_rate_ceiling(drive: &DriveConfig, forward_speed: f64) -> f64 {
    let t = clamp01(forward_speed.abs() / drive.full_turn_speed);
    lerp(drive.min_turn_rate, drive.max_turn_rate, t).to_radians()
}

/// Adds this tick's steer input, limits to `ceiling` and decays towards zero.
pub fn integrate_turn_rate(drive: &DriveConfig, turn_rate: f64, steer: f64, ceiling: f64) -> f64 {
    let driven = (turn_rate + steer * drive.steer_gain.to_radians()).clamp(-ceiling, ceiling);
    lerp(driven, 0.0, drive.turn_decay)
}

/// Yaw about `+Y` for one tick. A positive (rightward) turn rate yaws clockwise
/// seen from above, which is a negative angle.
pub fn yaw_increment(turn_rate: f64, dt: f64) -> f64 {
    -turn_rate * dt
}
