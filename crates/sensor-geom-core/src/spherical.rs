//! Spherical sensor measurements and conversion to the Cartesian sensor frame.
//!
//! A range sensor reports each return as an elevation angle `ε` above the
//! horizontal (x–y) plane, an azimuth angle `α` within that plane and a range
//! `r` along the ray. The Cartesian point in the same frame is
//!
//! ```text
//! x = r · cos(α) · cos(ε)
//! y = r · sin(α) · cos(ε)
//! z = r · sin(ε)
//! ```
//!
//! so that `x² + y² + z² = r²`.
//!
//! # Example
//!
//! ```
//! use sensor_geom_core::sph_to_cart;
//!
//! let p = sph_to_cart(0.0, std::f64::consts::FRAC_PI_2, 2.0);
//! assert!(p.x.abs() < 1e-12);
//! assert!((p.y - 2.0).abs() < 1e-12);
//! assert!(p.z.abs() < 1e-12);
//! ```

use crate::{Pt3, Real};
use serde::{Deserialize, Serialize};

/// A single spherical range measurement.
///
/// Angles are in radians and are not wrapped; the range is in metres and is
/// not validated (a negative range reflects the point through the origin).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SphericalMeasurement {
    /// Elevation above the horizontal plane, radians.
    pub elevation: Real,
    /// Azimuth within the horizontal plane, measured from +x towards +y, radians.
    pub azimuth: Real,
    /// Distance from the sensor origin, metres.
    pub range: Real,
}

impl SphericalMeasurement {
    pub fn new(elevation: Real, azimuth: Real, range: Real) -> Self {
        Self {
            elevation,
            azimuth,
            range,
        }
    }

    /// Convert to a Cartesian point in the sensor frame.
    pub fn to_cartesian(&self) -> Pt3 {
        sph_to_cart(self.elevation, self.azimuth, self.range)
    }

    /// Unit direction of the measurement ray (independent of range).
    pub fn direction(&self) -> Pt3 {
        sph_to_cart(self.elevation, self.azimuth, 1.0)
    }
}

/// Convert elevation `epsilon`, azimuth `alpha` (radians) and range `r`
/// (metres) into a Cartesian point in the sensor frame.
///
/// Total over all real inputs.
pub fn sph_to_cart(epsilon: Real, alpha: Real, r: Real) -> Pt3 {
    let (sin_e, cos_e) = epsilon.sin_cos();
    let (sin_a, cos_a) = alpha.sin_cos();
    Pt3::new(r * cos_a * cos_e, r * sin_a * cos_e, r * sin_e)
}

/// Convert a batch of measurements, preserving order.
pub fn sph_to_cart_batch(measurements: &[SphericalMeasurement]) -> Vec<Pt3> {
    measurements.iter().map(|m| m.to_cartesian()).collect()
}

/// Inverse of [`sph_to_cart`].
///
/// Returns `elevation ∈ [-π/2, π/2]`, `azimuth ∈ (-π, π]` and `range ≥ 0`.
/// The origin maps to all-zero angles.
pub fn cart_to_sph(p: &Pt3) -> SphericalMeasurement {
    let horizontal = p.x.hypot(p.y);
    let range = horizontal.hypot(p.z);
    if range == 0.0 {
        return SphericalMeasurement::new(0.0, 0.0, 0.0);
    }
    SphericalMeasurement {
        elevation: p.z.atan2(horizontal),
        azimuth: p.y.atan2(p.x),
        range,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI};

    fn assert_close(a: Real, b: Real, tol: Real) {
        assert!((a - b).abs() < tol, "expected {b}, got {a}");
    }

    #[test]
    fn range_is_preserved() {
        let angles = [-3.0, -FRAC_PI_2, -0.7, 0.0, 0.3, FRAC_PI_4, 1.2, PI, 7.5];
        let ranges = [0.0, 1e-3, 0.5, 1.0, 12.75, 250.0];
        for &e in &angles {
            for &a in &angles {
                for &r in &ranges {
                    let p = sph_to_cart(e, a, r);
                    let norm = p.coords.norm();
                    assert!(
                        (norm - r).abs() <= 1e-9 * r.max(1.0),
                        "|p| = {norm}, r = {r} (e={e}, a={a})"
                    );
                }
            }
        }
    }

    #[test]
    fn zero_elevation_stays_in_horizontal_plane() {
        let r = 3.0;
        let alpha = 0.8;
        let p = sph_to_cart(0.0, alpha, r);
        assert_eq!(p.z, 0.0);
        assert_close(p.x, r * alpha.cos(), 1e-12);
        assert_close(p.y, r * alpha.sin(), 1e-12);
    }

    #[test]
    fn zero_azimuth_has_no_y_component() {
        let p = sph_to_cart(0.4, 0.0, 5.0);
        assert_eq!(p.y, 0.0);
        assert_close(p.x, 5.0 * 0.4_f64.cos(), 1e-12);
        assert_close(p.z, 5.0 * 0.4_f64.sin(), 1e-12);
    }

    #[test]
    fn zero_range_is_origin() {
        for &(e, a) in &[(0.0, 0.0), (1.0, -2.0), (-FRAC_PI_2, PI)] {
            let p = sph_to_cart(e, a, 0.0);
            assert_eq!(p.coords.norm(), 0.0);
        }
    }

    #[test]
    fn straight_up_is_z_axis() {
        let p = sph_to_cart(FRAC_PI_2, 1.3, 2.0);
        assert_close(p.x, 0.0, 1e-12);
        assert_close(p.y, 0.0, 1e-12);
        assert_close(p.z, 2.0, 1e-12);
    }

    #[test]
    fn negative_range_reflects_through_origin() {
        let p = sph_to_cart(0.2, 0.9, 4.0);
        let q = sph_to_cart(0.2, 0.9, -4.0);
        assert_close((p.coords + q.coords).norm(), 0.0, 1e-12);
    }

    #[test]
    fn cart_to_sph_inverts_canonical_angles() {
        let m = SphericalMeasurement::new(-0.35, 2.1, 17.5);
        let back = cart_to_sph(&m.to_cartesian());
        assert_close(back.elevation, m.elevation, 1e-12);
        assert_close(back.azimuth, m.azimuth, 1e-12);
        assert_close(back.range, m.range, 1e-9);
    }

    #[test]
    fn cart_to_sph_of_origin_is_zero() {
        let m = cart_to_sph(&Pt3::origin());
        assert_eq!(m, SphericalMeasurement::new(0.0, 0.0, 0.0));
    }

    #[test]
    fn batch_preserves_order() {
        let ms = vec![
            SphericalMeasurement::new(0.0, 0.0, 1.0),
            SphericalMeasurement::new(0.0, FRAC_PI_2, 2.0),
            SphericalMeasurement::new(FRAC_PI_2, 0.0, 3.0),
        ];
        let pts = sph_to_cart_batch(&ms);
        assert_eq!(pts.len(), 3);
        assert_close(pts[0].x, 1.0, 1e-12);
        assert_close(pts[1].y, 2.0, 1e-12);
        assert_close(pts[2].z, 3.0, 1e-12);
    }

    #[test]
    fn direction_is_unit_length() {
        let m = SphericalMeasurement::new(0.6, -1.1, 42.0);
        assert_close(m.direction().coords.norm(), 1.0, 1e-12);
    }
}
