// ride_core/src/errors.rs

use thiserror::Error;

/// Design-time configuration mistakes. Every constructor in this crate validates
/// its configuration up front, so nothing can fail once a tick is running.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("sensor grid must be square so it reduces to a single cell, got {rows}x{cols}")]
    NonSquareGrid { rows: usize, cols: usize },

    #[error("sensor grid needs at least 2x2 probes, got {rows}x{cols}")]
    GridTooSmall { rows: usize, cols: usize },

    #[error("`{field}` must be positive and finite, got {value}")]
    NonPositive { field: &'static str, value: f64 },

    #[error("`{field}` must lie in [{min}, {max}], got {value}")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("curve `{curve}` is invalid: {reason}")]
    InvalidCurve { curve: &'static str, reason: String },
}

/// Checks `value > 0` (and finite), naming the offending field on failure.
pub(crate) fn ensure_positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { field, value })
    }
}

pub(crate) fn ensure_in_range(
    field: &'static str,
    value: f64,
    min: f64,
    max: f64,
) -> Result<(), ConfigError> {
    if value.is_finite() && (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            field,
            value,
            min,
            max,
        })
    }
}
