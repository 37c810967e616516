// ride_sim/src/simulation/core/transforms.rs

//! Conversions between Bevy's `f32` glam types and the controller's `f64`
//! nalgebra types. Both sides use the same axes (+Y up, -Z forward), so these
//! are plain precision casts with no basis change.

use bevy::prelude::{Quat as BevyQuat, Vec3 as BevyVec3};
use nalgebra::{Quaternion, UnitQuaternion, Vector3};
use ride_core::types::BodyState;

pub fn bevy_vec_to_nalgebra(v: BevyVec3) -> Vector3<f64> {
    Vector3::new(v.x as f64, v.y as f64, v.z as f64)
}

pub fn nalgebra_vec_to_bevy(v: &Vector3<f64>) -> BevyVec3 {
    BevyVec3::new(v.x as f32, v.y as f32, v.z as f32)
}

pub fn bevy_quat_to_nalgebra(q: BevyQuat) -> UnitQuaternion<f64> {
    // nalgebra's Quaternion::new takes (w, x, y, z).
    UnitQuaternion::from_quaternion(Quaternion::new(
        q.w as f64, q.x as f64, q.y as f64, q.z as f64,
    ))
}

pub fn nalgebra_quat_to_bevy(q: &UnitQuaternion<f64>) -> BevyQuat {
    let c = q.coords;
    BevyQuat::from_xyzw(c.x as f32, c.y as f32, c.z as f32, c.w as f32)
}

/// Builds the controller's snapshot of a rigid body from avian's components.
pub fn body_state_from(
    position: BevyVec3,
    rotation: BevyQuat,
    linear_velocity: BevyVec3,
    mass: f32,
) -> BodyState {
    BodyState {
        position: bevy_vec_to_nalgebra(position),
        rotation: bevy_quat_to_nalgebra(rotation),
        linear_velocity: bevy_vec_to_nalgebra(linear_velocity),
        mass: mass as f64,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn vectors_keep_their_axes() {
        let v = BevyVec3::new(1.0, 2.0, -3.0);
        let n = bevy_vec_to_nalgebra(v);
        assert_eq!(n, Vector3::new(1.0, 2.0, -3.0));
        assert_eq!(nalgebra_vec_to_bevy(&n), v);
    }

    #[test]
    fn yaw_quaternion_converts_both_ways() {
        let bevy_yaw = BevyQuat::from_rotation_y(FRAC_PI_2);
        let na_yaw = bevy_quat_to_nalgebra(bevy_yaw);
        let expected = UnitQuaternion::from_axis_angle(&Vector3::y_axis(), FRAC_PI_2 as f64);
        assert_abs_diff_eq!(na_yaw.angle_to(&expected), 0.0, epsilon = 1e-6);

        let back = nalgebra_quat_to_bevy(&na_yaw);
        assert!(back.dot(bevy_yaw).abs() > 1.0 - 1e-5);
    }

    #[test]
    fn body_state_forward_matches_bevy_forward() {
        let rotation = BevyQuat::from_rotation_y(FRAC_PI_2);
        let body = body_state_from(BevyVec3::ZERO, rotation, BevyVec3::ZERO, 80.0);
        let bevy_forward = rotation * BevyVec3::NEG_Z;
        let forward = body.forward();
        assert_abs_diff_eq!(forward.x, bevy_forward.x as f64, epsilon = 1e-6);
        assert_abs_diff_eq!(forward.z, bevy_forward.z as f64, epsilon = 1e-6);
        assert_abs_diff_eq!(body.mass, 80.0);
    }
}
