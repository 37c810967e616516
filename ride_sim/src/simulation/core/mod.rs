// ride_sim/src/simulation/core/mod.rs

pub mod app_state;
pub mod events;
pub mod layers;
pub mod prng;
pub mod simulation_setup;
pub mod spawn_requests;
pub mod transforms;
