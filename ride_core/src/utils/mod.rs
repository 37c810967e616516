// ride_core/src/utils/mod.rs

pub mod math;
