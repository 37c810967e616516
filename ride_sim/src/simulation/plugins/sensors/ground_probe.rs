// ride_sim/src/simulation/plugins/sensors/ground_probe.rs

use avian3d::prelude::{SpatialQuery, SpatialQueryFilter};
use bevy::prelude::*;
use nalgebra::Vector3;
use ride_core::sensing::GroundQuery;
use ride_core::types::CollisionMask;

use crate::simulation::core::layers::layer_mask;
use crate::simulation::core::transforms::nalgebra_vec_to_bevy;

/// Answers the controller's downward ray casts with avian's spatial query.
/// The vehicle's own collider is always excluded.
pub struct AvianGround<'a, 'w, 's> {
    spatial_query: &'a SpatialQuery<'w, 's>,
    vehicle: Entity,
}

impl<'a, 'w, 's> AvianGround<'a, 'w, 's> {
    pub fn new(spatial_query: &'a SpatialQuery<'w, 's>, vehicle: Entity) -> Self {
        Self {
            spatial_query,
            vehicle,
        }
    }
}

impl GroundQuery for AvianGround<'_, '_, '_> {
    fn cast_down(
        &self,
        origin: &Vector3<f64>,
        max_distance: f64,
        layer: CollisionMask,
    ) -> Option<f64> {
        let filter = SpatialQueryFilter::from_mask(layer_mask(layer))
            .with_excluded_entities([self.vehicle]);

        self.spatial_query
            .cast_ray(
                nalgebra_vec_to_bevy(origin),
                Dir3::NEG_Y,
                max_distance as f32,
                true,
                &filter,
            )
            .map(|hit| hit.distance as f64)
    }
}
