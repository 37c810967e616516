// ride_core/src/models/hover.rs

use crate::config::{HoverConfig, SensorGridConfig};
use crate::errors::ConfigError;
use crate::sensing::ground_grid::GroundSensorGrid;
use crate::sensing::{GroundQuery, GroundReading};
use crate::types::{up, BodyState};
use crate::utils::math::{clamp01, signed_square};
use nalgebra::Vector3;

/// Floor of the damping divisor, keeps the term finite at the rest height.
const MIN_DAMPING_PROXIMITY: f64 = 0.1;

/// Result of one hover update.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HoverOutput {
    /// World-space vertical force, already scaled by mass.
    pub force: Vector3<f64>,
    /// Forward slope under the vehicle, for the visual pitch.
    pub target_pitch: f64,
    pub reading: GroundReading,
}

/// Turns a ground reading into a vertical force that holds the body at
/// `hover_height`.
///
/// The force is the sum of:
/// * an idle lift that always cancels `idle_lift_fraction` of gravity;
/// * a response term that grows quadratically with compression below the rest height;
/// * a diminish term covering the rest of gravity, fading out over `diminish_distance`
///   above the rest height;
/// * a quadratic damping term on vertical velocity, stiffer near the rest height.
///
/// Everything but the idle lift is dropped when the ground is out of range or the
/// slope is too steep to trust.
#[derive(Debug, Clone)]
pub struct HoverForceModel {
    config: HoverConfig,
    gravity: f64,
    grid: GroundSensorGrid,
}

impl HoverForceModel {
    pub fn new(
        config: HoverConfig,
        grid_config: SensorGridConfig,
        gravity: f64,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            grid: GroundSensorGrid::new(grid_config)?,
            config,
            gravity,
        })
    }

    pub fn config(&self) -> &HoverConfig {
        &self.config
    }

    pub fn grid(&self) -> &GroundSensorGrid {
        &self.grid
    }

    pub fn update(&mut self, body: &BodyState, ground: &dyn GroundQuery) -> HoverOutput {
        let reading = self.grid.query(&body.position, &body.forward(), ground);
        let force = up() * self.vertical_force(&reading, body.vertical_velocity(), body.mass);
        HoverOutput {
            force,
            target_pitch: reading.slope.y,
            reading,
        }
    }

    /// Signed vertical force in newtons for a given reading and vertical speed.
    pub fn vertical_force(&self, reading: &GroundReading, vertical_speed: f64, mass: f64) -> f64 {
        let cfg = &self.config;
        let g = self.gravity;
        let idle_lift = cfg.idle_lift_fraction * g * mass;

        let d = reading.average_distance;
        if d >= cfg.grounded_distance() || reading.slope_magnitude() >= cfg.max_trusted_slope {
            return idle_lift;
        }

        let h = cfg.hover_height;
        let response = clamp01((h - d) / cfg.response_distance).powi(2) * cfg.response_force;
        let diminish = clamp01(1.0 - (d - h) / cfg.diminish_distance).powi(2)
            * g
            * (1.0 - cfg.idle_lift_fraction);

        let proximity = clamp01((d - h).abs().min(cfg.diminish_distance) / cfg.diminish_distance);
        let damping = -signed_square(vertical_speed) * mass / 2.0 * cfg.drag_rate
            / proximity.max(MIN_DAMPING_PROXIMITY);

        idle_lift + mass * (response + diminish) + damping
    }
}
