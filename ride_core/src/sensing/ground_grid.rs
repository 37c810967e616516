// ride_core/src/sensing/ground_grid.rs

use crate::config::SensorGridConfig;
use crate::errors::ConfigError;
use crate::sensing::pyramid::BoxPyramid;
use crate::sensing::{GroundQuery, GroundReading};
use crate::types::{reference_forward, reference_right, up};
use crate::utils::math::signed_angle_about;
use nalgebra::{UnitQuaternion, Vector2, Vector3};
use tracing::{debug, warn};

/// Share of the ray length assumed for probes that hit nothing: a missing reading is
/// treated as mildly lower ground rather than a cliff.
pub const MISS_DISTANCE_FRACTION: f64 = 0.6;

/// A fixed lattice of downward probes under the vehicle, reduced through a
/// box-average pyramid into a smoothed ground distance and a slope estimate.
#[derive(Debug, Clone)]
pub struct GroundSensorGrid {
    config: SensorGridConfig,
    /// Probe offsets in the vehicle's local horizontal plane, row-major.
    local_offsets: Vec<Vector3<f64>>,
    raw_distances: Vec<f64>,
    pyramid: BoxPyramid,
    reading: GroundReading,
    /// Inputs of the last query that actually cast rays.
    last_query: Option<(Vector3<f64>, Vector3<f64>)>,
    rays_cast: u64,
}

impl GroundSensorGrid {
    pub fn new(config: SensorGridConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let (rows, cols) = (config.rows(), config.cols());
        let [dx, dy] = config.spacing;
        let start_right = -((rows - 1) as f64) * dx / 2.0;
        let start_forward = -((cols - 1) as f64) * dy / 2.0;

        let mut local_offsets = Vec::with_capacity(rows * cols);
        for i in 0..rows {
            for j in 0..cols {
                let right = start_right + i as f64 * dx;
                let forward = start_forward + j as f64 * dy;
                local_offsets.push(reference_right() * right + reference_forward() * forward);
            }
        }

        if rows < 3 {
            warn!(
                "Sensor grid is {}x{}; slope estimation needs at least 3x3 and is disabled.",
                rows, cols
            );
        }
        debug!(
            "Sensor grid initialized: {}x{} probes, spacing {:?}, max ray {:.2} m",
            rows, cols, config.spacing, config.max_ray_distance
        );

        Ok(Self {
            raw_distances: vec![0.0; rows * cols],
            pyramid: BoxPyramid::new(rows),
            reading: GroundReading::default(),
            last_query: None,
            rays_cast: 0,
            local_offsets,
            config,
        })
    }

    pub fn config(&self) -> &SensorGridConfig {
        &self.config
    }

    /// Samples the ground around `origin` with the grid turned to `forward`'s heading.
    ///
    /// Only the yaw of `forward` matters. When both inputs compare equal to the last
    /// call the previous result is returned without casting; recompute is skipped
    /// only on that exact equality.
    pub fn query(
        &mut self,
        origin: &Vector3<f64>,
        forward: &Vector3<f64>,
        ground: &dyn GroundQuery,
    ) -> GroundReading {
        if self.last_query == Some((*origin, *forward)) {
            return self.reading;
        }
        self.last_query = Some((*origin, *forward));

        let yaw = signed_angle_about(&reference_forward(), forward, &up());
        let heading = UnitQuaternion::from_axis_angle(&Vector3::y_axis(), yaw);
        let max = self.config.max_ray_distance;
        let miss = max * MISS_DISTANCE_FRACTION;

        for (offset, distance) in self.local_offsets.iter().zip(self.raw_distances.iter_mut()) {
            let probe = origin + heading * offset;
            *distance = ground
                .cast_down(&probe, max, self.config.ground_layer)
                .map_or(miss, |d| d.clamp(0.0, max));
        }
        self.rays_cast += self.local_offsets.len() as u64;

        self.pyramid.rebuild(&self.raw_distances);
        self.reading = GroundReading {
            average_distance: self.pyramid.apex(),
            slope: self.slope_from_pyramid(),
        };
        self.reading
    }

    /// Finite difference across the penultimate 2x2 block. Distances are flipped
    /// (`1 - d`) so the gradient points toward rising ground.
    fn slope_from_pyramid(&self) -> Vector2<f64> {
        let Some([a, b, c, d]) = self.pyramid.penultimate_block() else {
            return Vector2::zeros();
        };
        let vert1 = 1.0 - (a + b) / 2.0;
        let vert2 = 1.0 - (c + d) / 2.0;
        let hor1 = 1.0 - (a + c) / 2.0;
        let hor2 = 1.0 - (b + d) / 2.0;
        let [dx, dy] = self.config.spacing;
        Vector2::new(
            (vert2 - vert1) / ((self.config.rows() - 1) as f64 * dy),
            (hor2 - hor1) / ((self.config.cols() - 1) as f64 * dx),
        )
    }

    pub fn reading(&self) -> GroundReading {
        self.reading
    }

    pub fn raw_distances(&self) -> &[f64] {
        &self.raw_distances
    }

    pub fn pyramid_levels(&self) -> &[Vec<f64>] {
        self.pyramid.levels()
    }

    pub fn local_offsets(&self) -> &[Vector3<f64>] {
        &self.local_offsets
    }

    /// Total number of rays cast since construction.
    pub fn rays_cast(&self) -> u64 {
        self.rays_cast
    }
}
