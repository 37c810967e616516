// ride_sim/src/simulation/plugins/vehicles/hovercraft.rs

use crate::{
    prelude::*,
    simulation::core::{
        events::BevyVehicleEvent,
        layers::{collision_mask, GameLayer},
        spawn_requests::SpawnVehicleRequest,
        transforms::{body_state_from, bevy_vec_to_nalgebra, nalgebra_vec_to_bevy},
    },
    simulation::plugins::{
        attitude::{Attitude, HullVisual},
        sensors::ground_probe::AvianGround,
    },
};
use avian3d::prelude::*;
use ride_core::messages::ContactReport;
use ride_core::types::CollisionMask;

// --- BEVY COMPONENTS for a Hovercraft ---

/// The engine-agnostic controller of one vehicle. Added by `process_hovercraft_logic`.
#[derive(Component, Debug)]
pub struct Hovercraft(pub VehicleDynamics);

/// A "mailbox" for driver intent. The keyboard controller or the autopilot
/// writes to this, and `drive_hovercraft` reads from it every fixed step.
#[derive(Component, Default, Debug)]
pub struct HovercraftInput {
    /// -1.0 (hard left) to 1.0 (hard right).
    pub steer: f32,
    /// -1.0 (full reverse) to 1.0 (full forward).
    pub throttle: f32,
    /// Set to leave Idle on the next tick. Consumed by the drive system.
    pub start_requested: bool,
}

/// Meshes shared by every hull, so they are not rebuilt per vehicle.
#[derive(Resource)]
struct HovercraftAssets {
    hull_material: Handle<StandardMaterial>,
    skirt_material: Handle<StandardMaterial>,
}

// --- THE PLUGIN ---
pub struct HovercraftPlugin;

impl Plugin for HovercraftPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            OnEnter(AppState::SceneBuilding),
            (
                setup_hovercraft_assets.in_set(SceneBuildSet::CreateRequests),
                process_hovercraft_logic.in_set(SceneBuildSet::ProcessVehicle),
                attach_hovercraft_physics.in_set(SceneBuildSet::Physics),
            ),
        )
        .add_systems(
            FixedUpdate,
            (
                drive_hovercraft.in_set(SimulationSet::Actuation),
                detect_crashes.in_set(SimulationSet::Collision),
            ),
        );
    }
}

// --- SYSTEMS ---

/// Only runs with a renderer; headless apps have no material assets.
fn setup_hovercraft_assets(
    mut commands: Commands,
    materials: Option<ResMut<Assets<StandardMaterial>>>,
) {
    let Some(mut materials) = materials else {
        return;
    };
    commands.insert_resource(HovercraftAssets {
        hull_material: materials.add(Color::srgb(0.15, 0.45, 0.85)),
        skirt_material: materials.add(Color::srgb(0.1, 0.1, 0.1)),
    });
}

/// SPAWNING (LOGIC): Builds the controller from the resolved ride configuration.
fn process_hovercraft_logic(
    mut commands: Commands,
    request_query: Query<(Entity, &Name, &SpawnVehicleRequest)>,
) {
    for (entity, name, request) in &request_query {
        match VehicleDynamics::new(request.0.ride.clone()) {
            Ok(dynamics) => {
                info!(
                    "  -> '{}': {}x{} probe grid, hover height {:.2} m",
                    name.as_str(),
                    request.0.ride.sensor_grid.rows(),
                    request.0.ride.sensor_grid.cols(),
                    request.0.ride.hover.hover_height
                );
                commands.entity(entity).insert((
                    Hovercraft(dynamics),
                    HovercraftInput::default(),
                    Attitude::default(),
                ));
            }
            Err(e) => {
                error!(
                    "[SPAWN] '{}' has an unusable ride configuration, not spawning it: {}",
                    name.as_str(),
                    e
                );
                commands.entity(entity).despawn();
            }
        }
    }
}

/// SPAWNING (PHYSICS): Attaches the rigid body, collider and visual hull.
fn attach_hovercraft_physics(
    mut commands: Commands,
    query: Query<(Entity, &Name, &SpawnVehicleRequest), (With<Hovercraft>, Without<RigidBody>)>,
    assets: Option<Res<HovercraftAssets>>,
    mut meshes: Option<ResMut<Assets<Mesh>>>,
) {
    for (entity, name, request) in &query {
        let [hx, hy, hz] = request.0.hull_half_extents;

        commands
            .entity(entity)
            .insert((
                RigidBody::Dynamic,
                Collider::cuboid(2.0 * hx, 2.0 * hy, 2.0 * hz),
                Mass(request.0.ride.drive.mass as f32),
                // Yaw comes from the controller, not from contact torques.
                LockedAxes::ROTATION_LOCKED,
                CollisionLayers::new(GameLayer::Vehicle, LayerMask::ALL),
                Friction::new(0.1),
                SleepingDisabled,
                ExternalForce::new(Vec3::ZERO).with_persistence(false),
                ExternalImpulse::default(),
                LinearVelocity::default(),
                AngularVelocity::default(),
                InheritedVisibility::VISIBLE,
            ))
            .with_children(|parent| {
                let mut hull = parent.spawn((
                    HullVisual,
                    Transform::default(),
                    Name::new(format!("{}_Hull", name)),
                ));

                if let (Some(assets), Some(meshes)) = (assets.as_deref(), meshes.as_mut()) {
                    hull.insert((
                        Mesh3d(meshes.add(Cuboid::new(2.0 * hx, 2.0 * hy, 2.0 * hz))),
                        MeshMaterial3d(assets.hull_material.clone()),
                    ))
                    .with_children(|skirt| {
                        skirt.spawn((
                            Mesh3d(meshes.add(Cuboid::new(2.0 * hx + 0.1, 0.08, 2.0 * hz + 0.1))),
                            MeshMaterial3d(assets.skirt_material.clone()),
                            Transform::from_xyz(0.0, -hy, 0.0),
                            Name::new(format!("{}_Skirt", name)),
                        ));
                    });
                }
            });
    }
}

/// RUNTIME: Ticks every controller and hands its output to avian.
#[allow(clippy::type_complexity)]
fn drive_hovercraft(
    time: Res<Time>,
    spatial_query: SpatialQuery,
    mut events: EventWriter<BevyVehicleEvent>,
    mut query: Query<(
        Entity,
        &Name,
        &mut Hovercraft,
        &mut HovercraftInput,
        &Position,
        &mut Rotation,
        &LinearVelocity,
        &Mass,
        &mut ExternalForce,
    )>,
) {
    let dt = time.delta_secs_f64();
    if dt <= 0.0 {
        return;
    }

    for (entity, name, mut hovercraft, mut input, position, mut rotation, velocity, mass, mut force) in
        &mut query
    {
        if std::mem::take(&mut input.start_requested) && !hovercraft.0.start() {
            debug!("[RIDE] '{}' has crashed and cannot restart.", name.as_str());
        }
        hovercraft
            .0
            .set_input(input.steer as f64, input.throttle as f64);

        let body = body_state_from(position.0, rotation.0, velocity.0, mass.0);
        let ground = AvianGround::new(&spatial_query, entity);
        let output = hovercraft.0.tick(&body, &ground, dt);

        force.apply_force(nalgebra_vec_to_bevy(&output.force));
        if output.yaw_rotation != 0.0 {
            rotation.0 = (Quat::from_rotation_y(output.yaw_rotation as f32) * rotation.0).normalize();
        }

        events.write_batch(
            output
                .events
                .into_iter()
                .map(|event| BevyVehicleEvent { entity, event }),
        );
    }
}

/// RUNTIME: Feeds the contacts of the last physics step to the controllers.
#[allow(clippy::type_complexity)]
fn detect_crashes(
    collisions: Collisions,
    layers: Query<&CollisionLayers>,
    mut vehicles: Query<(
        Entity,
        &Name,
        &mut Hovercraft,
        &Position,
        &Rotation,
        &LinearVelocity,
        &Mass,
        &mut ExternalImpulse,
        &mut LockedAxes,
    )>,
) {
    for (entity, name, mut hovercraft, position, rotation, velocity, mass, mut impulse, mut locked) in
        &mut vehicles
    {
        if hovercraft.0.mode() != Mode::Moving {
            continue;
        }
        let body = body_state_from(position.0, rotation.0, velocity.0, mass.0);

        for pair in collisions.collisions_with(entity) {
            let vehicle_is_first = pair.collider1 == entity;
            let other = if vehicle_is_first {
                pair.collider2
            } else {
                pair.collider1
            };
            let other_layers = layers
                .get(other)
                .map(collision_mask)
                .unwrap_or(CollisionMask(GameLayer::Default.to_bits()));

            for manifold in &pair.manifolds {
                let Some(contact) = contact_report(
                    manifold.points.iter().map(|p| (p.point, p.normal_impulse)),
                    manifold.normal,
                    vehicle_is_first,
                    other_layers,
                ) else {
                    continue;
                };

                let Some(response) = hovercraft.0.on_contact(&contact, &body) else {
                    continue;
                };
                warn!(
                    "[RIDE] '{}' crashed into {:?} at {:.1} m/s.",
                    name.as_str(),
                    other,
                    hovercraft.0.state().last_speed
                );
                impulse.apply_impulse_at_point(
                    nalgebra_vec_to_bevy(&response.impulse),
                    nalgebra_vec_to_bevy(&response.point),
                    position.0,
                );
                if response.release_constraints {
                    *locked = LockedAxes::new();
                }
            }
        }
    }
}

/// Builds the controller's view of one contact manifold from its first point,
/// given as `(world_point, normal_impulse)` pairs. `None` for an empty manifold.
///
/// Avian's manifold normal points from the first collider to the second; the
/// controller wants it pointing away from the obstacle, into the vehicle.
fn contact_report(
    mut points: impl Iterator<Item = (Vec3, f32)>,
    manifold_normal: Vec3,
    vehicle_is_first: bool,
    other_layers: CollisionMask,
) -> Option<ContactReport> {
    let (point, normal_impulse) = points.next()?;
    let normal = if vehicle_is_first {
        -manifold_normal
    } else {
        manifold_normal
    };
    Some(ContactReport {
        point: bevy_vec_to_nalgebra(point),
        normal: bevy_vec_to_nalgebra(normal),
        impulse: normal_impulse as f64,
        layers: other_layers,
    })
}
