// ride_core/src/dynamics/mod.rs

pub mod forces;
pub mod steering;
pub mod vehicle;

pub use vehicle::{Mode, VehicleDynamics, VehicleState};
