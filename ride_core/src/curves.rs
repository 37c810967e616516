// ride_core/src/curves.rs

use crate::errors::ConfigError;
use serde::Deserialize;

/// A piecewise-linear response curve over sorted `(x, y)` keys.
///
/// Inputs outside the key range clamp to the first/last value. In TOML a curve is
/// written as an array of pairs, e.g. `speed_factor_curve = [[0.0, 1.0], [1.0, 0.5]]`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct ResponseCurve {
    keys: Vec<(f64, f64)>,
}

impl ResponseCurve {
    pub fn new(keys: Vec<(f64, f64)>) -> Self {
        Self { keys }
    }

    /// A curve that returns `value` everywhere.
    pub fn constant(value: f64) -> Self {
        Self {
            keys: vec![(0.0, value)],
        }
    }

    pub fn keys(&self) -> &[(f64, f64)] {
        &self.keys
    }

    /// Rejects empty curves, non-finite keys and keys that are not strictly increasing in `x`.
    pub fn validate(&self, curve: &'static str) -> Result<(), ConfigError> {
        if self.keys.is_empty() {
            return Err(ConfigError::InvalidCurve {
                curve,
                reason: "curve has no keys".to_string(),
            });
        }
        if let Some((x, y)) = self
            .keys
            .iter()
            .find(|(x, y)| !x.is_finite() || !y.is_finite())
        {
            return Err(ConfigError::InvalidCurve {
                curve,
                reason: format!("key ({x}, {y}) is not finite"),
            });
        }
        if let Some(pair) = self.keys.windows(2).find(|w| w[1].0 <= w[0].0) {
            return Err(ConfigError::InvalidCurve {
                curve,
                reason: format!(
                    "keys must be strictly increasing in x, found {} after {}",
                    pair[1].0, pair[0].0
                ),
            });
        }
        Ok(())
    }

    pub fn evaluate(&self, x: f64) -> f64 {
        let (Some(first), Some(last)) = (self.keys.first(), self.keys.last()) else {
            return 0.0;
        };
        if x <= first.0 {
            return first.1;
        }
        if x >= last.0 {
            return last.1;
        }
        // `x` lies strictly inside the key range, so some segment contains it.
        let i = self.keys.partition_point(|(kx, _)| *kx <= x);
        let (x0, y0) = self.keys[i - 1];
        let (x1, y1) = self.keys[i];
        y0 + (y1 - y0) * (x - x0) / (x1 - x0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn interpolates_between_keys_and_clamps_outside() {
        let curve = ResponseCurve::new(vec![(0.0, 1.0), (0.5, 2.0), (1.0, 0.0)]);
        assert_abs_diff_eq!(curve.evaluate(-3.0), 1.0);
        assert_abs_diff_eq!(curve.evaluate(0.25), 1.5, epsilon = 1e-12);
        assert_abs_diff_eq!(curve.evaluate(0.5), 2.0, epsilon = 1e-12);
        assert_abs_diff_eq!(curve.evaluate(0.75), 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(curve.evaluate(8.0), 0.0);
    }

    #[test]
    fn constant_curve_is_flat() {
        let curve = ResponseCurve::constant(0.7);
        for x in [-1.0, 0.0, 0.3, 10.0] {
            assert_eq!(curve.evaluate(x), 0.7);
        }
        assert!(curve.validate("flat").is_ok());
    }

    #[test]
    fn validation_rejects_bad_keys() {
        assert!(ResponseCurve::new(vec![]).validate("empty").is_err());
        assert!(ResponseCurve::new(vec![(0.0, 1.0), (0.0, 2.0)])
            .validate("dup")
            .is_err());
        assert!(ResponseCurve::new(vec![(0.0, f64::NAN)])
            .validate("nan")
            .is_err());
    }
}
