// ride_core/src/types.rs

use nalgebra::{UnitQuaternion, Vector3};
use serde::Deserialize;

// --- Frame Convention ---
// Right-handed, +Y up. A vehicle with identity rotation faces -Z and its
// right-hand side is +X. This matches Bevy, so hosts copy components 1:1.

/// World up axis.
pub fn up() -> Vector3<f64> {
    Vector3::y()
}

/// Forward axis of an unrotated vehicle.
pub fn reference_forward() -> Vector3<f64> {
    -Vector3::z()
}

/// Right axis of an unrotated vehicle.
pub fn reference_right() -> Vector3<f64> {
    Vector3::x()
}

// --- Core Identifier ---

/// An opaque collision-layer bitmask, supplied by the host at initialization.
/// The core never resolves layer names; it only forwards and compares bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(transparent)]
pub struct CollisionMask(pub u32);

impl CollisionMask {
    pub const ALL: Self = Self(u32::MAX);
    pub const NONE: Self = Self(0);

    pub fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }
}

/// A read-only snapshot of the rigid body the controller drives.
/// The host fills this from its physics engine once per tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyState {
    pub position: Vector3<f64>,
    pub rotation: UnitQuaternion<f64>,
    pub linear_velocity: Vector3<f64>,
    pub mass: f64,
}

impl BodyState {
    pub fn forward(&self) -> Vector3<f64> {
        self.rotation * reference_forward()
    }

    pub fn right(&self) -> Vector3<f64> {
        self.rotation * reference_right()
    }

    /// Velocity with the vertical component removed.
    pub fn horizontal_velocity(&self) -> Vector3<f64> {
        Vector3::new(self.linear_velocity.x, 0.0, self.linear_velocity.z)
    }

    pub fn vertical_velocity(&self) -> f64 {
        self.linear_velocity.y
    }
}

/// Driver intent, both axes in `[-1, 1]`.
/// Positive steer turns right, positive throttle accelerates forward.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct InputVector {
    pub steer: f64,
    pub throttle: f64,
}

impl InputVector {
    pub fn new(steer: f64, throttle: f64) -> Self {
        Self {
            steer: steer.clamp(-1.0, 1.0),
            throttle: throttle.clamp(-1.0, 1.0),
        }
    }
}
