// ride_core/src/dynamics/forces.rs

//! Horizontal force terms. All of them scale with kinetic energy (`v|v| m / 2`)
//! rather than velocity, so they bite harder the faster the board slides.

use crate::config::DriveConfig;
use crate::utils::math::{normalize_or_zero, signed_square};
use nalgebra::Vector3;

/// The force that bleeds off sideways slip, split into its raw energy term and
/// the steer-dependent multiplier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LateralCancel {
    /// `sign(l) * l^2 * m / 2` with `l = -v . right`.
    pub raw: f64,
    pub curve_factor: f64,
}

impl LateralCancel {
    pub fn compute(
        drive: &DriveConfig,
        velocity: &Vector3<f64>,
        right: &Vector3<f64>,
        turn_rate: f64,
        turn_ceiling: f64,
        mass: f64,
    ) -> Self {
        let lateral = -velocity.dot(right);
        let turn_fraction = if turn_ceiling > 0.0 {
            turn_rate.abs() / turn_ceiling
        } else {
            0.0
        };
        Self {
            raw: signed_square(lateral) * mass / 2.0,
            curve_factor: drive.steer_cancel_curve.evaluate(turn_fraction),
        }
    }

    /// Signed force along the vehicle's right axis.
    pub fn along_right(&self) -> f64 {
        self.raw * self.curve_factor
    }

    /// Share of the cancelled slip handed to the forward axis.
    pub fn forwarded(&self, fraction: f64) -> f64 {
        self.raw.abs() * fraction * self.curve_factor
    }
}

/// Throttle force before the energy clamp.
pub fn throttle_force(drive: &DriveConfig, throttle: f64, forward_speed: f64) -> f64 {
    if throttle >= 0.0 {
        throttle
            * drive.max_acceleration
            * drive.speed_factor_curve.evaluate(forward_speed / drive.max_speed)
    } else {
        throttle * drive.max_deceleration
    }
}

/// Limits the total forward force so the board cannot push past the kinetic
/// energy of `max_speed`. The floor is always `-max_deceleration`.
pub fn clamp_forward(drive: &DriveConfig, force: f64, forward_speed: f64, mass: f64) -> f64 {
    let forward_energy = 0.5 * mass * forward_speed * forward_speed;
    let floor = -drive.max_deceleration;
    let ceiling = (drive.max_speed_energy() - forward_energy).max(floor);
    force.clamp(floor, ceiling)
}

/// Drag on the horizontal velocity, capped at `max_drag`.
pub fn drag(drive: &DriveConfig, horizontal_velocity: &Vector3<f64>, mass: f64) -> Vector3<f64> {
    let magnitude = (horizontal_velocity.norm_squared() * mass / 2.0 * drive.drag_coefficient)
        .clamp(0.0, drive.max_drag);
    -normalize_or_zero(horizontal_velocity) * magnitude
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn drive() -> DriveConfig {
        DriveConfig::default()
    }

    #[test]
    fn lateral_cancel_opposes_slip() {
        let drive = drive();
        let right = Vector3::x();
        let sliding_right =
            LateralCancel::compute(&drive, &Vector3::new(2.0, 0.0, 0.0), &right, 0.0, 1.0, 80.0);
        assert_abs_diff_eq!(sliding_right.raw, -160.0, epsilon = 1e-9);
        assert_abs_diff_eq!(sliding_right.along_right(), -160.0, epsilon = 1e-9);
        assert_abs_diff_eq!(sliding_right.forwarded(0.25), 40.0, epsilon = 1e-9);

        let sliding_left =
            LateralCancel::compute(&drive, &Vector3::new(-2.0, 0.0, 0.0), &right, 0.0, 1.0, 80.0);
        assert_abs_diff_eq!(sliding_left.along_right(), 160.0, epsilon = 1e-9);
    }

    #[test]
    fn cancel_grows_with_turn_fraction() {
        let drive = drive();
        let velocity = Vector3::new(1.0, 0.0, -5.0);
        let straight = LateralCancel::compute(&drive, &velocity, &Vector3::x(), 0.0, 2.0, 80.0);
        let hard = LateralCancel::compute(&drive, &velocity, &Vector3::x(), -2.0, 2.0, 80.0);
        assert_abs_diff_eq!(straight.curve_factor, 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(hard.curve_factor, 1.8, epsilon = 1e-12);
        assert!(hard.along_right().abs() > straight.along_right().abs());
    }

    #[test]
    fn zero_ceiling_does_not_divide_by_zero() {
        let cancel = LateralCancel::compute(&drive(), &Vector3::x(), &Vector3::x(), 0.3, 0.0, 80.0);
        assert!(cancel.along_right().is_finite());
    }

    #[test]
    fn reverse_throttle_ignores_the_speed_curve() {
        let drive = drive();
        assert_abs_diff_eq!(throttle_force(&drive, -0.5, 20.0), -600.0, epsilon = 1e-9);
        assert_abs_diff_eq!(throttle_force(&drive, 1.0, 0.0), 1600.0, epsilon = 1e-9);
        assert_abs_diff_eq!(throttle_force(&drive, 1.0, 25.0), 800.0, epsilon = 1e-9);
    }

    #[test]
    fn forward_force_never_exceeds_the_energy_budget() {
        let drive = drive();
        let mass = drive.mass;
        for speed_step in 0..=40 {
            let speed = speed_step as f64;
            let budget = drive.max_speed_energy() - 0.5 * mass * speed * speed;
            for throttle_step in -10..=10 {
                let throttle = throttle_step as f64 / 10.0;
                let raw = throttle_force(&drive, throttle, speed);
                let clamped = clamp_forward(&drive, raw, speed, mass);
                assert!(clamped >= -drive.max_deceleration);
                assert!(clamped <= budget.max(-drive.max_deceleration));
            }
        }
    }

    #[test]
    fn past_max_speed_the_clamp_collapses_to_the_floor() {
        let drive = drive();
        let clamped = clamp_forward(&drive, 1600.0, 40.0, drive.mass);
        assert_abs_diff_eq!(clamped, -drive.max_deceleration, epsilon = 1e-9);
    }

    #[test]
    fn drag_is_capped_and_opposes_motion() {
        let drive = drive();
        let slow = drag(&drive, &Vector3::new(0.0, 0.0, -1.0), 80.0);
        assert_abs_diff_eq!(slow, Vector3::new(0.0, 0.0, 40.0), epsilon = 1e-9);

        let fast = drag(&drive, &Vector3::new(30.0, 0.0, 0.0), 80.0);
        assert_abs_diff_eq!(fast, Vector3::new(-240.0, 0.0, 0.0), epsilon = 1e-9);

        assert_eq!(drag(&drive, &Vector3::zeros(), 80.0), Vector3::zeros());
    }
}
