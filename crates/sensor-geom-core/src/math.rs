//! Mathematical type definitions.
//!
//! Every public API in the workspace is expressed in terms of these aliases,
//! so the scalar type can be changed in one place.

use nalgebra::{Matrix3, Point3, Vector3};

/// Scalar type used throughout the library (currently `f64`).
pub type Real = f64;

/// 3D vector with [`Real`] components.
pub type Vec3 = Vector3<Real>;
/// 3D point with [`Real`] coordinates, in metres.
pub type Pt3 = Point3<Real>;
/// 3×3 matrix with [`Real`] entries.
pub type Mat3 = Matrix3<Real>;

/// Returns `true` when all three coordinates are finite.
pub fn is_finite_point(p: &Pt3) -> bool {
    p.x.is_finite() && p.y.is_finite() && p.z.is_finite()
}
