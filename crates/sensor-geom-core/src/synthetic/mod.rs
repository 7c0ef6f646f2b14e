//! Deterministic synthetic data generation helpers.
//!
//! This module provides small building blocks for constructing synthetic
//! plane-fitting problems used in tests, the CLI and examples:
//! - uniform random point clouds,
//! - exact and noisy samples of a known plane,
//! - simulated range scans of a plane seen from the sensor origin.
//!
//! All generators are deterministic: randomness comes from an explicitly
//! seeded [`rand::rngs::StdRng`] and point ordering is stable.
//!
//! # Example
//!
//! ```
//! use sensor_geom_core::{synthetic::plane, PlaneParams};
//!
//! let ground = PlaneParams::new(-1.5, 0.02, -0.01);
//! let pts = plane::plane_points_random(&ground, 100, 10.0, 0.01, 7);
//! assert_eq!(pts.len(), 100);
//! ```

pub mod plane;
