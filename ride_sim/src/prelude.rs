// ride_sim/src/prelude.rs

// Re-export the entire Bevy prelude for convenience.
pub use bevy::prelude::*;

// Re-export the ride_core prelude so plugins can name `VehicleDynamics`,
// `RideConfig`, `GroundQuery` and friends directly.
pub use ride_core::prelude::*;

// Re-export common simulation-specific types for easy access in other plugins.
pub use crate::simulation::config::structs::{ScenarioConfig, VehicleConfig};
pub use crate::simulation::core::app_state::{AppState, SceneBuildSet, SimulationSet};
pub use crate::simulation::core::events::BevyVehicleEvent;
pub use crate::simulation::core::layers::GameLayer;
pub use crate::simulation::plugins::vehicles::hovercraft::{Hovercraft, HovercraftInput};
