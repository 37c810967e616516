// ride_core/src/messages.rs

use crate::models::hover::HoverOutput;
use crate::types::CollisionMask;
use nalgebra::Vector3;

// =========================================================================
// == Controller Outputs ==
// =========================================================================

/// Notifications for whatever consumes the controller's state (attitude
/// follower, audio, UI). Emitted in tick order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VehicleEvent {
    /// Every Moving tick. `turn_rate` is in rad/s, positive to the right.
    SteerChanged {
        turn_rate: f64,
        lateral_cancel_over_mass: f64,
    },
    /// Every Moving tick, the forward slope under the vehicle.
    TargetPitchChanged { pitch: f64 },
    /// Only when the grounded/airborne status flips.
    AirStatusChanged { airborne: bool },
}

/// Everything the host must apply after one `VehicleDynamics::tick`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TickOutput {
    /// World-space force at the centre of mass, summed over all terms.
    pub force: Vector3<f64>,
    /// Yaw increment about `+Y` in radians for this tick.
    pub yaw_rotation: f64,
    /// The hover model's contribution. `None` on Idle ticks.
    pub hover: Option<HoverOutput>,
    pub events: Vec<VehicleEvent>,
}

// =========================================================================
// == Collision Exchange ==
// =========================================================================

/// A contact as reported by the host's physics engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactReport {
    pub point: Vector3<f64>,
    /// Unit normal pointing from the other surface towards the vehicle.
    pub normal: Vector3<f64>,
    /// Magnitude of the contact impulse in N·s.
    pub impulse: f64,
    /// Layers of the other collider.
    pub layers: CollisionMask,
}

/// The controller's answer to a qualifying crash.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CrashResponse {
    /// World-space impulse to apply once at `point`.
    pub impulse: Vector3<f64>,
    pub point: Vector3<f64>,
    /// The host should drop any rotation locks it keeps on the body.
    pub release_constraints: bool,
}
