// ride_sim/src/simulation/config/structs.rs

use bevy::prelude::{Quat, Resource, Transform};
use figment::value::Value;
use nalgebra::{UnitQuaternion, Vector3};
use ride_core::config::RideConfig;
use serde::Deserialize;

use crate::simulation::utils::serde_helpers;

// =========================================================================
// == Top-Level Configuration Resource ==
// =========================================================================

/// The root of a `scenario.toml` file.
///
/// Vehicles are kept as raw values here because they may reference prefabs
/// (`from = "vehicles.skimmer"`) that only the resolver can expand.
#[derive(Resource, Debug, Deserialize, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct ScenarioConfig {
    #[serde(default)]
    pub simulation: SimulationSettings,

    #[serde(default)]
    pub world: WorldSettings,

    /// The TOML has `[[vehicles]]`, which becomes a list of unresolved tables.
    #[serde(default)]
    pub vehicles: Vec<Value>,
}

impl ScenarioConfig {
    pub fn from_toml_str(source: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(source)
    }
}

// =========================================================================
// == Configuration Sub-Structs ==
// =========================================================================

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields, default)]
pub struct SimulationSettings {
    /// Seed for obstacle placement. `None` draws one from the OS.
    pub seed: Option<u64>,
    /// Fixed-step rate of the controller and the physics, in Hz.
    pub tick_rate_hz: f64,
    /// Wall-clock length of the run in seconds. Zero runs until the window closes.
    pub duration_seconds: f32,
    /// Drives every vehicle with a scripted input instead of the keyboard.
    pub autopilot: Option<AutopilotConfig>,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            seed: None,
            tick_rate_hz: 60.0,
            duration_seconds: 0.0,
            autopilot: None,
        }
    }
}

/// A throttle held constant and a steer that sweeps as a sine.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(deny_unknown_fields, default)]
pub struct AutopilotConfig {
    pub throttle: f32,
    pub steer_amplitude: f32,
    pub steer_period_seconds: f32,
    /// Seconds to hover in place before the vehicles are started.
    pub start_delay_seconds: f32,
}

impl Default for AutopilotConfig {
    fn default() -> Self {
        Self {
            throttle: 0.6,
            steer_amplitude: 0.5,
            steer_period_seconds: 6.0,
            start_delay_seconds: 1.0,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields, default)]
pub struct WorldSettings {
    /// Global gravity vector in m/s^2.
    pub gravity: [f32; 3],
    /// Side lengths of the flat ground slab, `[x, z]` in meters.
    pub ground_size: [f32; 2],
    pub obstacles: ObstacleField,
}

impl Default for WorldSettings {
    fn default() -> Self {
        Self {
            gravity: [0.0, -9.81, 0.0],
            ground_size: [200.0, 200.0],
            obstacles: ObstacleField::default(),
        }
    }
}

impl WorldSettings {
    pub fn gravity_magnitude(&self) -> f64 {
        let [x, y, z] = self.gravity;
        Vector3::new(x as f64, y as f64, z as f64).norm()
    }
}

/// Randomly placed crates and ramps the vehicles can crash into.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields, default)]
pub struct ObstacleField {
    pub walls: usize,
    pub ramps: usize,
    /// Obstacles are placed within this distance of the origin...
    pub placement_radius: f32,
    /// ...but no closer than this, so the spawn area stays clear.
    pub clear_radius: f32,
    /// Edge length range of the walls, in meters.
    pub size_range: [f32; 2],
}

impl Default for ObstacleField {
    fn default() -> Self {
        Self {
            walls: 12,
            ramps: 4,
            placement_radius: 70.0,
            clear_radius: 12.0,
            size_range: [1.0, 4.0],
        }
    }
}

/// A fully resolved `[[vehicles]]` entry.
#[derive(Debug, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct VehicleConfig {
    pub name: String,
    #[serde(default)]
    pub starting_pose: Pose,
    /// Collider half extents `[x, y, z]` of the hull, in meters.
    #[serde(default = "default_hull_half_extents")]
    pub hull_half_extents: [f32; 3],
    #[serde(default)]
    pub ride: RideConfig,
}

fn default_hull_half_extents() -> [f32; 3] {
    [0.6, 0.15, 1.1]
}

// =========================================================================
// == Helper Structs for Nested Configuration ==
// =========================================================================

#[derive(Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(deny_unknown_fields, default)]
pub struct Pose {
    #[serde(with = "serde_helpers::vec3_from_array")]
    pub translation: Vector3<f64>,

    /// Written as `[pitch, yaw, roll]` in degrees.
    #[serde(with = "serde_helpers::quat_from_euler_deg")]
    pub rotation: UnitQuaternion<f64>,
}

impl Default for Pose {
    fn default() -> Self {
        Self {
            translation: Vector3::zeros(),
            rotation: UnitQuaternion::identity(),
        }
    }
}

impl Pose {
    pub fn to_bevy_transform(&self) -> Transform {
        let t = self.translation;
        let r = self.rotation.coords;
        Transform::from_xyz(t.x as f32, t.y as f32, t.z as f32).with_rotation(Quat::from_xyzw(
            r.x as f32, r.y as f32, r.z as f32, r.w as f32,
        ))
    }
}
