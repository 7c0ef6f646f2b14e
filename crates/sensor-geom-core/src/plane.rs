use crate::{Pt3, Real, Vec3};
use serde::{Deserialize, Serialize};

/// Planar surface `z = a + b·x + c·y` in the sensor frame.
///
/// `a` is the height at the frame origin, `b` and `c` are the slopes along
/// x and y.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PlaneParams {
    pub a: Real,
    pub b: Real,
    pub c: Real,
}

impl PlaneParams {
    pub fn new(a: Real, b: Real, c: Real) -> Self {
        Self { a, b, c }
    }

    /// Build from a `[a, b, c]` parameter vector.
    pub fn from_vector(theta: &Vec3) -> Self {
        Self::new(theta[0], theta[1], theta[2])
    }

    /// Parameters as a `[a, b, c]` vector.
    pub fn as_vector(&self) -> Vec3 {
        Vec3::new(self.a, self.b, self.c)
    }

    /// Plane height at `(x, y)`.
    pub fn height_at(&self, x: Real, y: Real) -> Real {
        self.a + self.b * x + self.c * y
    }

    /// Signed vertical residual `p.z - height_at(p.x, p.y)`.
    pub fn residual(&self, p: &Pt3) -> Real {
        p.z - self.height_at(p.x, p.y)
    }

    /// Unit normal pointing towards +z.
    pub fn normal(&self) -> Vec3 {
        Vec3::new(-self.b, -self.c, 1.0).normalize()
    }

    /// Point on the plane directly above/below `(x, y)`.
    pub fn point_at(&self, x: Real, y: Real) -> Pt3 {
        Pt3::new(x, y, self.height_at(x, y))
    }

    /// Largest absolute difference between two parameter sets.
    pub fn max_abs_diff(&self, other: &PlaneParams) -> Real {
        (self.a - other.a)
            .abs()
            .max((self.b - other.b).abs())
            .max((self.c - other.c).abs())
    }
}
