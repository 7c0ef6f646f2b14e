//! Closed-form estimators for `sensor-geom`.
//!
//! Currently a single estimator: the least-squares surface
//! `z = a + b·x + c·y` ([`plane_fit`]), with normal-equation, QR and SVD
//! solvers and explicit rejection of degenerate point sets.

pub mod math;
pub mod plane_fit;

pub use plane_fit::*;
