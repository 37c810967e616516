// ride_sim/src/simulation/utils/serde_helpers.rs

//! `#[serde(with = ...)]` adapters for writing poses in scenario files as plain
//! arrays instead of nalgebra's internal layout.

/// `[x, y, z]` in meters.
pub mod vec3_from_array {
    use nalgebra::Vector3;
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vector3<f64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let [x, y, z]: [f64; 3] = Deserialize::deserialize(deserializer)?;
        Ok(Vector3::new(x, y, z))
    }
}

/// `[pitch, yaw, roll]` in degrees, applied yaw first (about +Y), then pitch
/// (about +X), then roll (about -Z, the forward axis).
pub mod quat_from_euler_deg {
    use nalgebra::{UnitQuaternion, Vector3};
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<UnitQuaternion<f64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let [pitch, yaw, roll]: [f64; 3] = Deserialize::deserialize(deserializer)?;
        Ok(from_degrees(pitch, yaw, roll))
    }

    pub fn from_degrees(pitch: f64, yaw: f64, roll: f64) -> UnitQuaternion<f64> {
        let yaw = UnitQuaternion::from_axis_angle(&Vector3::y_axis(), yaw.to_radians());
        let pitch = UnitQuaternion::from_axis_angle(&Vector3::x_axis(), pitch.to_radians());
        let roll = UnitQuaternion::from_axis_angle(&-Vector3::z_axis(), roll.to_radians());
        yaw * pitch * roll
    }
}
