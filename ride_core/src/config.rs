// ride_core/src/config.rs

//! Immutable tuning for every controller component.
//!
//! All structs deserialize from the `ride` section of a scenario or prefab file and
//! fall back to the defaults of a mid-weight board for omitted fields. Nothing here
//! is meant to change after `VehicleDynamics::new` has accepted it.

use crate::curves::ResponseCurve;
use crate::errors::{ensure_in_range, ensure_positive, ConfigError};
use crate::types::CollisionMask;
use serde::Deserialize;

// =========================================================================
// == Top-Level Configuration ==
// =========================================================================

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct RideConfig {
    pub sensor_grid: SensorGridConfig,
    pub hover: HoverConfig,
    pub drive: DriveConfig,
    pub crash: CrashConfig,
    /// Magnitude of gravity in m/s^2. The host applies gravity itself; the
    /// controller only needs the value to size its lift.
    pub gravity: f64,
}

impl Default for RideConfig {
    fn default() -> Self {
        Self {
            sensor_grid: SensorGridConfig::default(),
            hover: HoverConfig::default(),
            drive: DriveConfig::default(),
            crash: CrashConfig::default(),
            gravity: 9.81,
        }
    }
}

impl RideConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.sensor_grid.validate()?;
        self.hover.validate()?;
        self.drive.validate()?;
        self.crash.validate()?;
        ensure_positive("gravity", self.gravity)
    }
}

// =========================================================================
// == Sub-Sections ==
// =========================================================================

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct SensorGridConfig {
    /// Probe count as `[rows, cols]`. Rows run along the vehicle's right axis,
    /// columns along its forward axis.
    pub dimensions: [usize; 2],
    /// Probe spacing in meters as `[dx, dy]` (right, forward).
    pub spacing: [f64; 2],
    pub max_ray_distance: f64,
    /// Layers that count as ground for the probe rays.
    pub ground_layer: CollisionMask,
}

impl Default for SensorGridConfig {
    fn default() -> Self {
        Self {
            dimensions: [3, 3],
            spacing: [0.2, 0.2],
            max_ray_distance: 2.0,
            ground_layer: CollisionMask::ALL,
        }
    }
}

impl SensorGridConfig {
    pub fn rows(&self) -> usize {
        self.dimensions[0]
    }

    pub fn cols(&self) -> usize {
        self.dimensions[1]
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let (rows, cols) = (self.rows(), self.cols());
        if rows != cols {
            return Err(ConfigError::NonSquareGrid { rows, cols });
        }
        if rows < 2 {
            return Err(ConfigError::GridTooSmall { rows, cols });
        }
        ensure_positive("sensor_grid.spacing[0]", self.spacing[0])?;
        ensure_positive("sensor_grid.spacing[1]", self.spacing[1])?;
        ensure_positive("sensor_grid.max_ray_distance", self.max_ray_distance)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct HoverConfig {
    /// Rest distance between the body origin and the ground.
    pub hover_height: f64,
    /// Compression below `hover_height` at which the response term saturates.
    pub response_distance: f64,
    /// Upward acceleration (per unit mass) of the fully saturated response term.
    pub response_force: f64,
    /// Band above `hover_height` over which gravity compensation fades out.
    pub diminish_distance: f64,
    /// Share of gravity that is always compensated, grounded or not.
    pub idle_lift_fraction: f64,
    /// Scale of the vertical damping term.
    pub drag_rate: f64,
    /// Slope magnitude beyond which the reading is not trusted.
    pub max_trusted_slope: f64,
}

impl Default for HoverConfig {
    fn default() -> Self {
        Self {
            hover_height: 0.5,
            response_distance: 0.1,
            response_force: 5.0,
            diminish_distance: 0.2,
            idle_lift_fraction: 0.3,
            drag_rate: 1.0,
            max_trusted_slope: 0.5,
        }
    }
}

impl HoverConfig {
    /// Ground distance beyond which the vehicle counts as airborne.
    pub fn grounded_distance(&self) -> f64 {
        self.hover_height + self.diminish_distance
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure_positive("hover.hover_height", self.hover_height)?;
        ensure_positive("hover.response_distance", self.response_distance)?;
        ensure_in_range("hover.response_force", self.response_force, 0.0, f64::MAX)?;
        ensure_positive("hover.diminish_distance", self.diminish_distance)?;
        ensure_in_range("hover.idle_lift_fraction", self.idle_lift_fraction, 0.0, 1.0)?;
        ensure_in_range("hover.drag_rate", self.drag_rate, 1.0, 5.0)?;
        ensure_positive("hover.max_trusted_slope", self.max_trusted_slope)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct DriveConfig {
    /// kg. Must match the mass the host gives the rigid body.
    pub mass: f64,
    /// m/s. Sets the forward kinetic-energy budget.
    pub max_speed: f64,
    /// N at full throttle.
    pub max_acceleration: f64,
    /// N at full reverse throttle; also the floor of the forward clamp.
    pub max_deceleration: f64,
    /// N. Cap of the horizontal drag force.
    pub max_drag: f64,
    pub drag_coefficient: f64,
    /// deg/s added to the turn rate per tick at full steer input.
    pub steer_gain: f64,
    /// deg/s.
    pub max_turn_rate: f64,
    /// deg/s. Turn rate ceiling when stationary.
    pub min_turn_rate: f64,
    /// m/s of forward speed at which the full turn rate becomes available.
    pub full_turn_speed: f64,
    /// Fraction of the turn rate removed every tick.
    pub turn_decay: f64,
    /// Share of the lateral cancel force redirected forward while grounded.
    pub forwarded_cancel_fraction: f64,
    /// Throttle multiplier over `forward_speed / max_speed`.
    pub speed_factor_curve: ResponseCurve,
    /// Cancel-force multiplier over `|turn_rate| / max_turn_rate`.
    pub steer_cancel_curve: ResponseCurve,
}

impl Default for DriveConfig {
    fn default() -> Self {
        Self {
            mass: 80.0,
            max_speed: 25.0,
            max_acceleration: 1600.0,
            max_deceleration: 1200.0,
            max_drag: 240.0,
            drag_coefficient: 1.0,
            steer_gain: 40.0,
            max_turn_rate: 120.0,
            min_turn_rate: 1.0,
            full_turn_speed: 6.0,
            turn_decay: 0.1,
            forwarded_cancel_fraction: 0.25,
            speed_factor_curve: ResponseCurve::new(vec![(0.0, 1.0), (0.7, 0.85), (1.0, 0.5)]),
            steer_cancel_curve: ResponseCurve::new(vec![(0.0, 1.0), (1.0, 1.8)]),
        }
    }
}

impl DriveConfig {
    /// Kinetic energy of the body at `max_speed`, the forward-force budget.
    pub fn max_speed_energy(&self) -> f64 {
        0.5 * self.mass * self.max_speed * self.max_speed
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure_positive("drive.mass", self.mass)?;
        ensure_positive("drive.max_speed", self.max_speed)?;
        ensure_positive("drive.max_acceleration", self.max_acceleration)?;
        ensure_positive("drive.max_deceleration", self.max_deceleration)?;
        ensure_in_range("drive.max_drag", self.max_drag, 0.0, f64::MAX)?;
        ensure_in_range("drive.drag_coefficient", self.drag_coefficient, 0.0, f64::MAX)?;
        ensure_positive("drive.steer_gain", self.steer_gain)?;
        ensure_positive("drive.max_turn_rate", self.max_turn_rate)?;
        ensure_in_range(
            "drive.min_turn_rate",
            self.min_turn_rate,
            0.0,
            self.max_turn_rate,
        )?;
        ensure_positive("drive.full_turn_speed", self.full_turn_speed)?;
        ensure_in_range("drive.turn_decay", self.turn_decay, 0.0, 1.0)?;
        ensure_in_range(
            "drive.forwarded_cancel_fraction",
            self.forwarded_cancel_fraction,
            0.0,
            1.0,
        )?;
        self.speed_factor_curve.validate("drive.speed_factor_curve")?;
        self.steer_cancel_curve.validate("drive.steer_cancel_curve")
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct CrashConfig {
    /// Layers whose contacts are checked for hard hits.
    pub crash_layer: CollisionMask,
    /// Contacts weaker than `min_impulse_per_mass * mass` are ignored.
    pub min_impulse_per_mass: f64,
    /// Contacts whose normal lies within this angle of vertical are bumps, not walls.
    pub max_bump_angle_deg: f64,
    /// Rebound impulse per unit of pre-impact speed and mass.
    pub rebound_factor: f64,
}

impl Default for CrashConfig {
    fn default() -> Self {
        Self {
            crash_layer: CollisionMask::ALL,
            min_impulse_per_mass: 6.0,
            max_bump_angle_deg: 45.0,
            rebound_factor: 0.4,
        }
    }
}

impl CrashConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure_in_range(
            "crash.min_impulse_per_mass",
            self.min_impulse_per_mass,
            0.0,
            f64::MAX,
        )?;
        ensure_in_range("crash.max_bump_angle_deg", self.max_bump_angle_deg, 0.0, 90.0)?;
        ensure_in_range("crash.rebound_factor", self.rebound_factor, 0.0, f64::MAX)
    }
}
