// ride_sim/src/simulation/plugins/attitude/mod.rs

pub mod follower;

use crate::prelude::*;
use crate::simulation::core::events::BevyVehicleEvent;
use follower::AttitudeFollower;

/// The follower state of one vehicle, stored on the vehicle entity.
#[derive(Component, Default, Debug)]
pub struct Attitude(pub AttitudeFollower);

/// Marks the child entity whose local rotation shows the roll and pitch.
#[derive(Component, Default, Debug)]
pub struct HullVisual;

pub struct AttitudePlugin;

impl Plugin for AttitudePlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (drain_vehicle_events, apply_attitude)
                .chain()
                .run_if(in_state(AppState::Running)),
        );
    }
}

fn drain_vehicle_events(
    mut events: EventReader<BevyVehicleEvent>,
    mut followers: Query<&mut Attitude>,
) {
    for BevyVehicleEvent { entity, event } in events.read() {
        if let Ok(mut attitude) = followers.get_mut(*entity) {
            attitude.0.on_event(event);
        }
    }
}

fn apply_attitude(
    mut vehicles: Query<(&mut Attitude, &Children)>,
    mut visuals: Query<&mut Transform, With<HullVisual>>,
) {
    for (mut attitude, children) in &mut vehicles {
        attitude.0.step();
        // Negative pitch is nose up, which is a positive turn about +X here.
        let rotation = Quat::from_rotation_x(-(attitude.0.pitch_deg() as f32).to_radians())
            * Quat::from_axis_angle(Vec3::NEG_Z, (attitude.0.roll_deg() as f32).to_radians());

        let mut hull = visuals.iter_many_mut(children);
        while let Some(mut transform) = hull.fetch_next() {
            transform.rotation = rotation;
        }
    }
}
