// ride_sim/examples/01_hover_track.rs

//! Hovercraft on a seeded obstacle field.
//!
//! This example shows how to:
//! 1. Parse the command line into the `Cli` resource.
//! 2. Set up Bevy and avian, windowed or headless.
//! 3. Add `RideSimulationPlugin`, which loads the scenario and builds the scene.
//! 4. Drive the vehicles with the keyboard (any key starts them).
//!
//! To run this example:
//! `cargo run --example 01_hover_track`
//! `cargo run --example 01_hover_track -- --headless --seed 7`

use avian3d::prelude::*;
use bevy::{log::LogPlugin, render::mesh::MeshPlugin, scene::ScenePlugin, state::app::StatesPlugin};
use clap::Parser;
use ride_sim::cli::Cli;
use ride_sim::prelude::*;
use ride_sim::RideSimulationPlugin;

const LOG_FILTER: &str = "info,wgpu_core=error,wgpu_hal=error,ride_sim=debug,ride_core=debug";

fn main() -> AppExit {
    let cli = Cli::parse();
    let headless = cli.headless;

    let mut app = App::new();

    if headless {
        // No window, no renderer. Meshes still exist so avian's collider
        // plugins find the asset types they expect.
        app.add_plugins((
            MinimalPlugins,
            TransformPlugin,
            AssetPlugin::default(),
            MeshPlugin,
            ScenePlugin,
            StatesPlugin,
            LogPlugin {
                filter: LOG_FILTER.to_string(),
                ..default()
            },
        ));
    } else {
        app.add_plugins(DefaultPlugins.set(LogPlugin {
            level: bevy::log::Level::INFO,
            filter: LOG_FILTER.to_string(),
            ..default()
        }))
        .add_systems(
            Update,
            keyboard_controller.run_if(in_state(AppState::Running)),
        );
    }

    app.add_plugins(PhysicsPlugins::default())
        .insert_resource(cli)
        .init_state::<AppState>()
        .add_plugins(RideSimulationPlugin);

    info!("Starting Ride simulation (headless = {}).", headless);
    app.run()
}

/// Arrow keys steer and throttle every vehicle. Any key press asks the
/// vehicles to leave Idle; the request waits for the next fixed step.
fn keyboard_controller(
    keyboard_input: Res<ButtonInput<KeyCode>>,
    mut query: Query<&mut HovercraftInput>,
) {
    let start = keyboard_input.get_just_pressed().next().is_some();

    for mut input in &mut query {
        input.steer = 0.0;
        input.throttle = 0.0;

        if keyboard_input.pressed(KeyCode::ArrowUp) {
            input.throttle += 1.0;
        }
        if keyboard_input.pressed(KeyCode::ArrowDown) {
            input.throttle -= 1.0;
        }
        if keyboard_input.pressed(KeyCode::ArrowRight) {
            input.steer += 1.0;
        }
        if keyboard_input.pressed(KeyCode::ArrowLeft) {
            input.steer -= 1.0;
        }
        input.start_requested |= start;
    }
}
