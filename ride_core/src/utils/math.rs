// ride_core/src/utils/math.rs

use nalgebra::Vector3;

/// Unclamped linear interpolation, `t = 0` gives `a`.
#[inline]
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

#[inline]
pub fn clamp01(x: f64) -> f64 {
    x.clamp(0.0, 1.0)
}

/// `x * |x|`, the sign-preserving square used by every energy-proportional term.
#[inline]
pub fn signed_square(x: f64) -> f64 {
    x * x.abs()
}

/// Signed angle in radians from `from` to `to`, measured about `axis`
/// (right-handed: counter-clockwise when looking down `axis`).
/// Both vectors are projected onto the plane normal to `axis` first.
pub fn signed_angle_about(from: &Vector3<f64>, to: &Vector3<f64>, axis: &Vector3<f64>) -> f64 {
    let axis = axis.normalize();
    let a = from - axis * from.dot(&axis);
    let b = to - axis * to.dot(&axis);
    if a.norm_squared() < 1e-12 || b.norm_squared() < 1e-12 {
        return 0.0;
    }
    let sin = axis.dot(&a.cross(&b));
    let cos = a.dot(&b);
    sin.atan2(cos)
}

/// Unit vector of `v`, or zero when `v` is (nearly) zero.
pub fn normalize_or_zero(v: &Vector3<f64>) -> Vector3<f64> {
    let n = v.norm();
    if n > 1e-9 {
        v / n
    } else {
        Vector3::zeros()
    }
}
