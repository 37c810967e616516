// ride_sim/src/simulation/plugins/attitude/follower.rs

//! Cosmetic roll and pitch for the hull mesh. Nothing here feeds back into
//! the physics; it only smooths the controller's steer and slope signals.

use ride_core::messages::VehicleEvent;
use ride_core::utils::math::lerp;

const MAX_ROLL_DEG: f64 = 60.0;
/// Degrees of roll per unit of lateral cancel acceleration.
const ROLL_PER_CANCEL: f64 = 5.0;
const ROLL_LERP: f64 = 0.1;

/// `[nose up, nose down]` limits, in degrees. Negative pitch is nose up.
const PITCH_LIMITS_DEG: (f64, f64) = (-30.0, 45.0);
const PITCH_LERP_RISING: f64 = 0.04;
const PITCH_LERP_FALLING: f64 = 0.12;
const PITCH_GAIN_GROUNDED: f64 = 1.0;
const PITCH_GAIN_AIRBORNE: f64 = 0.2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttitudeFollower {
    roll_deg: f64,
    pitch_deg: f64,
    target_roll_deg: f64,
    target_slope: f64,
    pitch_gain: f64,
}

impl Default for AttitudeFollower {
    fn default() -> Self {
        Self {
            roll_deg: 0.0,
            pitch_deg: 0.0,
            target_roll_deg: 0.0,
            target_slope: 0.0,
            pitch_gain: PITCH_GAIN_GROUNDED,
        }
    }
}

impl AttitudeFollower {
    pub fn on_event(&mut self, event: &VehicleEvent) {
        match *event {
            VehicleEvent::SteerChanged {
                lateral_cancel_over_mass,
                ..
            } => {
                self.target_roll_deg =
                    (-lateral_cancel_over_mass * ROLL_PER_CANCEL).clamp(-MAX_ROLL_DEG, MAX_ROLL_DEG);
            }
            VehicleEvent::TargetPitchChanged { pitch } => self.target_slope = pitch,
            VehicleEvent::AirStatusChanged { airborne } => {
                self.pitch_gain = if airborne {
                    PITCH_GAIN_AIRBORNE
                } else {
                    PITCH_GAIN_GROUNDED
                };
            }
        }
    }

    /// Pitch the hull is heading for, from the latest slope signal.
    pub fn target_pitch_deg(&self) -> f64 {
        (-self.target_slope.atan().to_degrees()).clamp(PITCH_LIMITS_DEG.0, PITCH_LIMITS_DEG.1)
    }

    /// Advances both angles one frame toward their targets.
    pub fn step(&mut self) {
        self.roll_deg = lerp(self.roll_deg, self.target_roll_deg, ROLL_LERP);

        let target_pitch = self.target_pitch_deg();
        let rate = if target_pitch > self.pitch_deg {
            PITCH_LERP_RISING
        } else {
            PITCH_LERP_FALLING
        };
        self.pitch_deg = lerp(self.pitch_deg, target_pitch, self.pitch_gain * rate);
    }

    pub fn roll_deg(&self) -> f64 {
        self.roll_deg
    }

    pub fn pitch_deg(&self) -> f64 {
        self.pitch_deg
    }
}
