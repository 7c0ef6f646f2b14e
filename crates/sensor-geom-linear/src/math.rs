//! Numerical conditioning helpers for the linear solvers.
//!
//! # Hartley Normalization
//!
//! Centering the regressors and scaling them to a common magnitude before
//! solving keeps the design matrix well conditioned when the point cloud
//! sits far from the sensor origin. The estimated parameters are mapped back
//! to the original frame afterwards.
//!
//! # References
//!
//! Hartley & Zisserman, "Multiple View Geometry in Computer Vision", 2nd ed.,
//! Algorithm 4.2 (Normalized DLT)

use nalgebra::{DMatrix, DVector};
use sensor_geom_core::{PlaneParams, Pt3, Real};

/// Similarity transform applied to the `x, y` regressors:
/// `x' = scale · (x - cx)`, `y' = scale · (y - cy)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct XyNormalization {
    pub cx: Real,
    pub cy: Real,
    pub scale: Real,
}

impl XyNormalization {
    /// No-op transform.
    pub fn identity() -> Self {
        Self {
            cx: 0.0,
            cy: 0.0,
            scale: 1.0,
        }
    }

    /// Centre the `x, y` coordinates at their mean and scale so the mean
    /// distance from the centroid is `√2`.
    ///
    /// Returns `None` if `points` is empty or all points share the same
    /// `(x, y)`.
    pub fn from_points(points: &[Pt3]) -> Option<Self> {
        if points.is_empty() {
            return None;
        }

        let n = points.len() as Real;
        let mut cx = 0.0;
        let mut cy = 0.0;
        for p in points {
            cx += p.x;
            cy += p.y;
        }
        cx /= n;
        cy /= n;

        let mut mean_dist = 0.0;
        for p in points {
            mean_dist += (p.x - cx).hypot(p.y - cy);
        }
        mean_dist /= n;

        if mean_dist <= Real::EPSILON * (1.0 + cx.abs().max(cy.abs())) {
            return None;
        }

        Some(Self {
            cx,
            cy,
            scale: std::f64::consts::SQRT_2 / mean_dist,
        })
    }

    /// Normalized `(x', y')` of a point.
    pub fn apply(&self, p: &Pt3) -> (Real, Real) {
        (self.scale * (p.x - self.cx), self.scale * (p.y - self.cy))
    }

    /// Map plane parameters estimated in the normalized frame back to the
    /// original frame.
    ///
    /// `z = a' + b'x' + c'y'` expands to `b = s·b'`, `c = s·c'`,
    /// `a = a' - b·cx - c·cy`.
    pub fn denormalize(&self, normalized: &PlaneParams) -> PlaneParams {
        let b = self.scale * normalized.b;
        let c = self.scale * normalized.c;
        PlaneParams::new(normalized.a - b * self.cx - c * self.cy, b, c)
    }
}

/// Build the design matrix `A` (rows `[1, x', y']`) and target vector `z`.
pub fn design_system(points: &[Pt3], norm: &XyNormalization) -> (DMatrix<Real>, DVector<Real>) {
    let n = points.len();
    let mut a = DMatrix::<Real>::zeros(n, 3);
    let mut z = DVector::<Real>::zeros(n);
    for (i, p) in points.iter().enumerate() {
        let (x, y) = norm.apply(p);
        a[(i, 0)] = 1.0;
        a[(i, 1)] = x;
        a[(i, 2)] = y;
        z[i] = p.z;
    }
    (a, z)
}

/// Ratio of smallest to largest value in `values`, by magnitude.
///
/// Returns `0.0` when every value is zero or the slice is empty.
pub fn magnitude_ratio(values: impl IntoIterator<Item = Real>) -> Real {
    let mut min = Real::INFINITY;
    let mut max: Real = 0.0;
    let mut any = false;
    for v in values {
        let v = v.abs();
        min = min.min(v);
        max = max.max(v);
        any = true;
    }
    if !any || max <= 0.0 {
        return 0.0;
    }
    min / max
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalization_centres_and_scales() {
        let points = vec![
            Pt3::new(100.0, 200.0, 0.0),
            Pt3::new(102.0, 200.0, 0.0),
            Pt3::new(100.0, 202.0, 0.0),
            Pt3::new(102.0, 202.0, 0.0),
        ];
        let norm = XyNormalization::from_points(&points).unwrap();
        assert!((norm.cx - 101.0).abs() < 1e-12);
        assert!((norm.cy - 201.0).abs() < 1e-12);

        let mut mean_dist = 0.0;
        for p in &points {
            let (x, y) = norm.apply(p);
            mean_dist += x.hypot(y);
        }
        mean_dist /= points.len() as Real;
        assert!((mean_dist - std::f64::consts::SQRT_2).abs() < 1e-12);
    }

    #[test]
    fn coincident_xy_has_no_normalization() {
        let points = vec![Pt3::new(1.0, 1.0, 0.0), Pt3::new(1.0, 1.0, 5.0)];
        assert!(XyNormalization::from_points(&points).is_none());
        assert!(XyNormalization::from_points(&[]).is_none());
    }

    #[test]
    fn denormalize_preserves_heights() {
        let norm = XyNormalization {
            cx: 3.0,
            cy: -2.0,
            scale: 0.25,
        };
        let normalized = PlaneParams::new(0.7, 1.2, -0.4);
        let plane = norm.denormalize(&normalized);
        for &(x, y) in &[(0.0, 0.0), (3.0, -2.0), (10.0, 4.0)] {
            let (xn, yn) = norm.apply(&Pt3::new(x, y, 0.0));
            let expected = normalized.height_at(xn, yn);
            assert!((plane.height_at(x, y) - expected).abs() < 1e-12);
        }
    }

    #[test]
    fn design_rows() {
        let points = vec![Pt3::new(1.0, 2.0, 3.0), Pt3::new(4.0, 5.0, 6.0)];
        let (a, z) = design_system(&points, &XyNormalization::identity());
        assert_eq!(a.shape(), (2, 3));
        assert_eq!(a.row(1).iter().copied().collect::<Vec<_>>(), vec![1.0, 4.0, 5.0]);
        assert_eq!(z.as_slice(), &[3.0, 6.0]);
    }

    #[test]
    fn magnitude_ratio_cases() {
        assert_eq!(magnitude_ratio([4.0, -2.0, 1.0]), 0.25);
        assert_eq!(magnitude_ratio([0.0, 0.0]), 0.0);
        assert_eq!(magnitude_ratio(Vec::<Real>::new()), 0.0);
    }
}
