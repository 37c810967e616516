// ride_sim/src/simulation/core/spawn_requests.rs
use crate::simulation::config::VehicleConfig;
use bevy::prelude::Component;

/// Temporary marker carrying a resolved vehicle through the SceneBuilding passes.
#[derive(Component, Clone)]
pub struct SpawnVehicleRequest(pub VehicleConfig);
