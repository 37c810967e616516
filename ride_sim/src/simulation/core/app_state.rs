// ride_sim/src/simulation/core/app_state.rs

use bevy::{ecs::schedule::SystemSet, prelude::States};

/// Defines the major phases of the application's lifecycle.
#[derive(States, Debug, Clone, Eq, PartialEq, Hash, Default)]
pub enum AppState {
    /// The initial state. The scenario and prefab catalog are read here.
    #[default]
    AssetLoading,

    /// Configuration is resolved. The ground, obstacles and vehicles are
    /// being spawned from it.
    SceneBuilding,

    /// The scene is built. The controllers tick in `FixedUpdate`.
    Running,
}

/// System sets to control the order of execution during the SceneBuilding state.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum SceneBuildSet {
    /// Pass 1: Create vehicle shells and attach the spawn request.
    CreateRequests,

    /// Pass 2: Build the controller from the request and attach it.
    ProcessVehicle,

    /// Pass 3: Attach rigid bodies, colliders and visuals.
    Physics,

    /// Pass 4: Remove all temporary request components.
    Cleanup,
}

// =========================================================================
// == Main Simulation Sets ==
// =========================================================================

/// Per-tick order of the controller systems. Avian steps after all of them.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum SimulationSet {
    /// Write `HovercraftInput` (keyboard or autopilot) and start vehicles.
    Input,
    /// Tick every controller and hand its force and yaw to the rigid body.
    Actuation,
    /// Inspect the contacts of the last physics step for crashes.
    Collision,
}
