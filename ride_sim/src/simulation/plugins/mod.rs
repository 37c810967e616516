// ride_sim/src/simulation/plugins/mod.rs

pub mod attitude;
pub mod autopilot;
pub mod sensors;
pub mod vehicles;
pub mod world;
