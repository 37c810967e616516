// ride_core/src/lib.rs

pub mod config;
pub mod curves;
pub mod dynamics;
pub mod errors;
pub mod messages;
pub mod models;
pub mod prelude;
pub mod sensing;
pub mod types;
pub mod utils;

#[cfg(test)]
pub(crate) mod testing;
