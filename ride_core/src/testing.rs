// ride_core/src/testing.rs

//! Mock ground surfaces shared by the unit tests.

use crate::sensing::GroundQuery;
use crate::types::CollisionMask;
use nalgebra::Vector3;
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;

/// An infinite plane `y = base + gradient_x * x + gradient_z * z` that counts casts.
#[derive(Debug, Default)]
pub struct PlaneGround {
    pub base: f64,
    pub gradient_x: f64,
    pub gradient_z: f64,
    pub casts: Cell<usize>,
}

impl PlaneGround {
    pub fn flat(height: f64) -> Self {
        Self {
            base: height,
            ..Self::default()
        }
    }

    pub fn tilted(height: f64, gradient_x: f64, gradient_z: f64) -> Self {
        Self {
            base: height,
            gradient_x,
            gradient_z,
            casts: Cell::new(0),
        }
    }

    pub fn height_at(&self, x: f64, z: f64) -> f64 {
        self.base + self.gradient_x * x + self.gradient_z * z
    }
}

impl GroundQuery for PlaneGround {
    fn cast_down(
        &self,
        origin: &Vector3<f64>,
        max_distance: f64,
        _layer: CollisionMask,
    ) -> Option<f64> {
        self.casts.set(self.casts.get() + 1);
        let distance = origin.y - self.height_at(origin.x, origin.z);
        (0.0..=max_distance).contains(&distance).then_some(distance)
    }
}

/// Nothing below, ever.
#[derive(Debug, Default)]
pub struct Void {
    pub casts: Cell<usize>,
}

impl GroundQuery for Void {
    fn cast_down(&self, _: &Vector3<f64>, _: f64, _: CollisionMask) -> Option<f64> {
        self.casts.set(self.casts.get() + 1);
        None
    }
}

/// Replays a fixed list of distances in probe order.
#[derive(Debug, Default)]
pub struct ScriptedGround {
    pub distances: RefCell<VecDeque<f64>>,
}

impl ScriptedGround {
    pub fn new(distances: &[f64]) -> Self {
        Self {
            distances: RefCell::new(distances.iter().copied().collect()),
        }
    }
}

impl GroundQuery for ScriptedGround {
    fn cast_down(&self, _: &Vector3<f64>, _: f64, _: CollisionMask) -> Option<f64> {
        self.distances.borrow_mut().pop_front()
    }
}
