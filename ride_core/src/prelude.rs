// ride_core/src/prelude.rs

// --- Core Abstractions ---
pub use crate::sensing::GroundQuery;

// --- Configuration ---
pub use crate::config::{CrashConfig, DriveConfig, HoverConfig, RideConfig, SensorGridConfig};
pub use crate::curves::ResponseCurve;
pub use crate::errors::ConfigError;

// --- Data Structures ---
pub use crate::messages::{ContactReport, CrashResponse, TickOutput, VehicleEvent};
pub use crate::sensing::GroundReading;
pub use crate::types::{BodyState, CollisionMask, InputVector};

// --- Components ---
pub use crate::dynamics::{Mode, VehicleDynamics, VehicleState};
pub use crate::models::hover::{HoverForceModel, HoverOutput};
pub use crate::sensing::ground_grid::GroundSensorGrid;
