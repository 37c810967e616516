// ride_sim/src/simulation/plugins/sensors/mod.rs

pub mod ground_probe;
