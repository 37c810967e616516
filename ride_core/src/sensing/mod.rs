// ride_core/src/sensing/mod.rs

pub mod ground_grid;
pub mod pyramid;

use crate::types::CollisionMask;
use nalgebra::{Vector2, Vector3};

/// The contract for whatever scene the vehicle hovers over.
///
/// The host implements this over its physics engine's ray queries. The controller
/// only ever asks one question: how far below `origin` is the first surface on
/// `layer`, looking straight down (`-Y`) and no further than `max_distance`.
pub trait GroundQuery {
    /// Returns the hit distance, or `None` when nothing was hit within `max_distance`.
    fn cast_down(&self, origin: &Vector3<f64>, max_distance: f64, layer: CollisionMask)
        -> Option<f64>;
}

/// Result of one sensor grid query.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GroundReading {
    /// Pyramid-averaged distance from the vehicle origin to the ground.
    pub average_distance: f64,
    /// Terrain gradient in the vehicle frame: `x` rises to the right, `y` rises ahead.
    pub slope: Vector2<f64>,
}

impl GroundReading {
    pub fn slope_magnitude(&self) -> f64 {
        self.slope.norm()
    }
}
