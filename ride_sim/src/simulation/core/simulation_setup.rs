// ride_sim/src/simulation/core/simulation_setup.rs

use avian3d::prelude::Gravity;

use crate::prelude::*;
use crate::simulation::config::ResolvedVehicles;
use crate::simulation::core::events::BevyVehicleEvent;
use crate::simulation::core::prng::SimulationRng;
use crate::simulation::core::spawn_requests::SpawnVehicleRequest;

pub struct SimulationSetupPlugin;

/// Counts down `simulation.duration_seconds` once the scene is running.
#[derive(Resource)]
struct RunTimer(Timer);

impl Plugin for SimulationSetupPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<BevyVehicleEvent>();

        // --- CONFIGURE THE SPAWNING PIPELINE ---
        // This chain of SystemSets guarantees the correct spawning order.
        app.configure_sets(
            OnEnter(AppState::SceneBuilding),
            (
                SceneBuildSet::CreateRequests,
                SceneBuildSet::ProcessVehicle,
                SceneBuildSet::Physics,
                SceneBuildSet::Cleanup,
            )
                .chain(),
        );

        app.add_systems(
            OnEnter(AppState::SceneBuilding),
            (
                apply_simulation_settings.before(SceneBuildSet::CreateRequests),
                spawn_vehicle_shells.in_set(SceneBuildSet::CreateRequests),
                cleanup_spawn_requests.in_set(SceneBuildSet::Cleanup),
                transition_to_running
                    .in_set(SceneBuildSet::Cleanup)
                    .after(cleanup_spawn_requests),
            ),
        );

        // Input, then the controllers, then crash checks. Avian steps in
        // FixedPostUpdate, after all three.
        app.configure_sets(
            FixedUpdate,
            (
                SimulationSet::Input,
                SimulationSet::Actuation,
                SimulationSet::Collision,
            )
                .chain()
                .run_if(in_state(AppState::Running)),
        );

        app.add_systems(
            Update,
            exit_after_duration.run_if(in_state(AppState::Running)),
        );
    }
}

/// Pushes the scenario's `[simulation]` and `[world]` settings into the engine:
/// the fixed timestep, gravity, and the seeded RNG.
fn apply_simulation_settings(
    mut commands: Commands,
    scenario: Res<ScenarioConfig>,
    mut fixed_time: ResMut<Time<Fixed>>,
    mut gravity: ResMut<Gravity>,
) {
    let settings = &scenario.simulation;

    let tick_rate = if settings.tick_rate_hz.is_finite() && settings.tick_rate_hz > 0.0 {
        settings.tick_rate_hz
    } else {
        warn!(
            "[SETUP] Ignoring tick_rate_hz = {}, keeping {:.1} Hz.",
            settings.tick_rate_hz,
            1.0 / fixed_time.timestep().as_secs_f64()
        );
        1.0 / fixed_time.timestep().as_secs_f64()
    };
    fixed_time.set_timestep_hz(tick_rate);

    gravity.0 = Vec3::from_array(scenario.world.gravity);

    let (rng, seed) = SimulationRng::from_seed(settings.seed);
    commands.insert_resource(rng);

    if settings.duration_seconds > 0.0 {
        commands.insert_resource(RunTimer(Timer::from_seconds(
            settings.duration_seconds,
            TimerMode::Once,
        )));
    }

    info!(
        "[SETUP] Fixed step {:.1} Hz, gravity {:?}, seed {}.",
        tick_rate, gravity.0, seed
    );
}

fn spawn_vehicle_shells(mut commands: Commands, resolved_vehicles: Res<ResolvedVehicles>) {
    if resolved_vehicles.0.is_empty() {
        warn!("[SPAWN] The scenario has no vehicles.");
    }
    for vehicle_config in &resolved_vehicles.0 {
        info!(
            "[SPAWN] Posting spawn request for vehicle: {}",
            &vehicle_config.name
        );

        commands.spawn((
            Name::new(vehicle_config.name.clone()),
            vehicle_config.starting_pose.to_bevy_transform(),
            SpawnVehicleRequest(vehicle_config.clone()),
        ));
    }
}

fn cleanup_spawn_requests(mut commands: Commands, query: Query<Entity, With<SpawnVehicleRequest>>) {
    info!("[CLEANUP] Removing spawn request components.");
    for entity in &query {
        commands.entity(entity).remove::<SpawnVehicleRequest>();
    }
}

/// Runs once at the end of the `OnEnter(SceneBuilding)` chain.
fn transition_to_running(mut next_state: ResMut<NextState<AppState>>) {
    info!("Scene building complete. Transitioning to Running state.");
    next_state.set(AppState::Running);
}

fn exit_after_duration(
    time: Res<Time>,
    timer: Option<ResMut<RunTimer>>,
    mut exit: EventWriter<AppExit>,
) {
    let Some(mut timer) = timer else {
        return;
    };
    if timer.0.tick(time.delta()).just_finished() {
        info!(
            "[SETUP] Ran for {:.1} s, exiting.",
            timer.0.duration().as_secs_f32()
        );
        exit.write(AppExit::Success);
    }
}
