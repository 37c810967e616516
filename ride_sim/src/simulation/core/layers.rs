// ride_sim/src/simulation/core/layers.rs
use avian3d::prelude::*;
use ride_core::types::CollisionMask;

#[derive(PhysicsLayer, Default, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameLayer {
    /// Anything not placed on a more specific layer.
    #[default]
    Default,
    /// The ground slab and ramps. Probe rays hover over these.
    Ground,
    /// Walls and crates. Hitting one hard enough is a crash.
    Obstacle,
    /// Hovercraft hulls.
    Vehicle,
}

/// Converts a controller mask into the avian mask with the same bits.
pub fn layer_mask(mask: CollisionMask) -> LayerMask {
    LayerMask(mask.0)
}

/// The layers a collider belongs to, as seen by the controller.
pub fn collision_mask(layers: &CollisionLayers) -> CollisionMask {
    CollisionMask(layers.memberships.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bits_follow_declaration_order() {
        assert_eq!(GameLayer::Default.to_bits(), 1);
        assert_eq!(GameLayer::Ground.to_bits(), 2);
        assert_eq!(GameLayer::Obstacle.to_bits(), 4);
        assert_eq!(GameLayer::Vehicle.to_bits(), 8);
    }

    #[test]
    fn masks_round_trip_through_avian() {
        let layers = CollisionLayers::new(GameLayer::Obstacle, LayerMask::ALL);
        let mask = collision_mask(&layers);
        assert!(mask.intersects(CollisionMask(GameLayer::Obstacle.to_bits())));
        assert_eq!(layer_mask(mask), LayerMask(4));
    }
}
