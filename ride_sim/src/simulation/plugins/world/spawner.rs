// ride_sim/src/simulation/plugins/world/spawner.rs

use crate::prelude::*;
use crate::simulation::config::structs::ObstacleField;
use crate::simulation::core::layers::GameLayer;
use crate::simulation::core::prng::SimulationRng;
use avian3d::prelude::*;
use rand::Rng;
use std::f32::consts::TAU;

const GROUND_THICKNESS: f32 = 1.0;
const RAMP_LENGTH: f32 = 8.0;
const RAMP_WIDTH: f32 = 4.0;
const RAMP_THICKNESS: f32 = 0.4;
/// Inclination range of the ramps, in degrees.
const RAMP_ANGLE_DEG: (f32, f32) = (8.0, 20.0);

/// One obstacle chosen by the layout generator, before anything is spawned.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObstaclePlacement {
    pub kind: ObstacleKind,
    pub transform: Transform,
    /// Full edge lengths of the cuboid.
    pub size: Vec3,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObstacleKind {
    Wall,
    Ramp,
}

impl ObstacleKind {
    /// Ramps are hovered over; walls are crashed into.
    fn layer(self) -> GameLayer {
        match self {
            ObstacleKind::Wall => GameLayer::Obstacle,
            ObstacleKind::Ramp => GameLayer::Ground,
        }
    }
}

/// Draws wall and ramp placements inside the annulus between `clear_radius`
/// and `placement_radius`, so the spawn area stays free.
pub fn plan_obstacles(field: &ObstacleField, rng: &mut impl Rng) -> Vec<ObstaclePlacement> {
    let inner = field.clear_radius.max(0.0);
    let outer = field.placement_radius.max(inner);
    let [min_size, max_size] = field.size_range;
    let (min_size, max_size) = (min_size.min(max_size), min_size.max(max_size));

    let mut placements = Vec::with_capacity(field.walls + field.ramps);

    for _ in 0..field.walls {
        let at = ground_point(rng, inner, outer);
        let size = Vec3::new(
            sample(rng, min_size, max_size),
            sample(rng, min_size, max_size),
            sample(rng, min_size, max_size),
        );
        let yaw = rng.gen_range(0.0..TAU);
        placements.push(ObstaclePlacement {
            kind: ObstacleKind::Wall,
            transform: Transform::from_xyz(at.x, size.y * 0.5, at.y)
                .with_rotation(Quat::from_rotation_y(yaw)),
            size,
        });
    }

    for _ in 0..field.ramps {
        let at = ground_point(rng, inner, outer);
        let yaw = rng.gen_range(0.0..TAU);
        let incline = rng
            .gen_range(RAMP_ANGLE_DEG.0..RAMP_ANGLE_DEG.1)
            .to_radians();
        // Lift the centre so the low edge meets the ground.
        let rise = 0.5 * RAMP_LENGTH * incline.sin();
        placements.push(ObstaclePlacement {
            kind: ObstacleKind::Ramp,
            transform: Transform::from_xyz(at.x, rise, at.y)
                .with_rotation(Quat::from_rotation_y(yaw) * Quat::from_rotation_x(incline)),
            size: Vec3::new(RAMP_WIDTH, RAMP_THICKNESS, RAMP_LENGTH),
        });
    }

    placements
}

fn ground_point(rng: &mut impl Rng, inner: f32, outer: f32) -> Vec2 {
    let angle = rng.gen_range(0.0..TAU);
    let radius = sample(rng, inner, outer);
    Vec2::new(radius * angle.cos(), radius * angle.sin())
}

fn sample(rng: &mut impl Rng, min: f32, max: f32) -> f32 {
    if max > min {
        rng.gen_range(min..max)
    } else {
        min
    }
}

pub struct WorldSpawnerPlugin;

impl Plugin for WorldSpawnerPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            OnEnter(AppState::SceneBuilding),
            (
                spawn_lighting_and_camera,
                spawn_ground.in_set(SceneBuildSet::Physics),
                spawn_obstacles.in_set(SceneBuildSet::Physics),
            ),
        );
    }
}

/// Lights and a static camera. Skipped when there is no renderer.
fn spawn_lighting_and_camera(mut commands: Commands, materials: Option<Res<Assets<StandardMaterial>>>) {
    if materials.is_none() {
        return;
    }
    commands.spawn((
        DirectionalLight {
            shadows_enabled: true,
            illuminance: 15_000.0,
            ..default()
        },
        Transform::from_xyz(20.0, 40.0, 10.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));

    let camera_transform = Transform::from_xyz(-30.0, 25.0, 30.0).looking_at(Vec3::ZERO, Vec3::Y);
    commands.spawn((Camera3d::default(), camera_transform));
}

fn spawn_ground(
    mut commands: Commands,
    scenario: Res<ScenarioConfig>,
    mut meshes: Option<ResMut<Assets<Mesh>>>,
    mut materials: Option<ResMut<Assets<StandardMaterial>>>,
) {
    let [x, z] = scenario.world.ground_size;
    info!("[SCENE] Spawning {:.0} x {:.0} m ground slab.", x, z);

    let mut ground = commands.spawn((
        Name::new("Ground"),
        RigidBody::Static,
        Collider::cuboid(x, GROUND_THICKNESS, z),
        CollisionLayers::new(GameLayer::Ground, LayerMask::ALL),
        // The top face sits at y = 0.
        Transform::from_xyz(0.0, -0.5 * GROUND_THICKNESS, 0.0),
    ));

    if let (Some(meshes), Some(materials)) = (meshes.as_mut(), materials.as_mut()) {
        ground.insert((
            Mesh3d(meshes.add(Cuboid::new(x, GROUND_THICKNESS, z))),
            MeshMaterial3d(materials.add(Color::srgb(0.35, 0.5, 0.3))),
        ));
    }
}

fn spawn_obstacles(
    mut commands: Commands,
    scenario: Res<ScenarioConfig>,
    mut rng: ResMut<SimulationRng>,
    mut meshes: Option<ResMut<Assets<Mesh>>>,
    mut materials: Option<ResMut<Assets<StandardMaterial>>>,
) {
    let placements = plan_obstacles(&scenario.world.obstacles, &mut rng.0);
    info!(
        "[SCENE] Spawning {} walls and {} ramps.",
        scenario.world.obstacles.walls, scenario.world.obstacles.ramps
    );

    for (index, placement) in placements.iter().enumerate() {
        let mut obstacle = commands.spawn((
            Name::new(format!("{:?}_{}", placement.kind, index)),
            RigidBody::Static,
            Collider::cuboid(placement.size.x, placement.size.y, placement.size.z),
            CollisionLayers::new(placement.kind.layer(), LayerMask::ALL),
            placement.transform,
        ));

        if let (Some(meshes), Some(materials)) = (meshes.as_mut(), materials.as_mut()) {
            let color = match placement.kind {
                ObstacleKind::Wall => Color::srgb(0.7, 0.25, 0.2),
                ObstacleKind::Ramp => Color::srgb(0.6, 0.6, 0.55),
            };
            obstacle.insert((
                Mesh3d(meshes.add(Cuboid::from_size(placement.size))),
                MeshMaterial3d(materials.add(color)),
            ));
        }
    }
}
