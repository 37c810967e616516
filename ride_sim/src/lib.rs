// ride_sim/src/lib.rs

use bevy::prelude::*;

use crate::simulation::config::ConfigPlugin;
use crate::simulation::core::simulation_setup::SimulationSetupPlugin;
use crate::simulation::plugins::attitude::AttitudePlugin;
use crate::simulation::plugins::autopilot::AutopilotPlugin;
use crate::simulation::plugins::vehicles::hovercraft::HovercraftPlugin;
use crate::simulation::plugins::world::spawner::WorldSpawnerPlugin;

// This prelude is for convenience for other files WITHIN the ride_sim crate.
pub mod prelude;

pub mod cli;
pub mod simulation;

/// The main plugin that brings together all the simulation parts.
/// A binary adds this after Bevy's and avian's plugins and `init_state::<AppState>()`.
pub struct RideSimulationPlugin;

impl Plugin for RideSimulationPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins((
            // Reads the scenario and catalog, then moves to SceneBuilding.
            ConfigPlugin,
            // Timestep, gravity, RNG and the spawning pipeline.
            SimulationSetupPlugin,
            // Ground slab, obstacles, lighting, camera.
            WorldSpawnerPlugin,
            // The controller itself, ticking in FixedUpdate.
            HovercraftPlugin,
            // Cosmetic roll and pitch of the hull mesh.
            AttitudePlugin,
            // Scripted input for headless runs.
            AutopilotPlugin,
        ));
    }
}
