//! Core math and geometry primitives for `sensor-geom`.
//!
//! This crate contains:
//! - linear algebra type aliases (`Real`, `Vec3`, `Pt3`, ...),
//! - spherical sensor measurements and their conversion to the Cartesian
//!   sensor frame ([`sph_to_cart`], [`cart_to_sph`]),
//! - the planar surface model `z = a + b·x + c·y` ([`PlaneParams`]),
//! - deterministic synthetic data generators ([`synthetic`]).
//!
//! Plane estimation itself lives in `sensor-geom-linear`.

/// Linear algebra type aliases.
pub mod math;
/// Planar surface model.
pub mod plane;
/// Spherical sensor measurements and frame conversion.
pub mod spherical;
/// Seeded synthetic point and scan generators.
pub mod synthetic;

pub use math::*;
pub use plane::*;
pub use spherical::*;
