// ride_sim/src/simulation/core/events.rs
use bevy::prelude::{Entity, Event};
use ride_core::messages::VehicleEvent;

/// A controller event tagged with the vehicle entity that raised it.
#[derive(Event, Debug, Clone, Copy)]
pub struct BevyVehicleEvent {
    pub entity: Entity,
    pub event: VehicleEvent,
}
