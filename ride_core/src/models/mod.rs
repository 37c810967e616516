// ride_core/src/models/mod.rs

pub mod hover;
