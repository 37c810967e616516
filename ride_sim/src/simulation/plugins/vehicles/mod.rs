// ride_sim/src/simulation/plugins/vehicles/mod.rs

pub mod hovercraft;
