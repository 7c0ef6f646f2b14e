//! Least-squares fitting of the surface `z = a + b·x + c·y`.
//!
//! # Algorithm
//!
//! Given `n >= 3` points, build the design matrix `A` with rows
//! `[1, xᵢ, yᵢ]` and the target vector `z = [z₁, …, zₙ]`, then solve
//!
//! ```text
//! min_θ ‖A·θ - z‖²,   θ = [a, b, c]ᵀ
//! ```
//!
//! with one of three interchangeable solvers ([`LeastSquaresMethod`]):
//!
//! - **Normal equations**: `θ = (AᵀA)⁻¹ Aᵀz` with an explicit 3×3 inverse.
//!   Cheapest, but squares the condition number of `A`.
//! - **QR**: Householder QR of `A`, then back-substitution on `R`.
//! - **SVD** (default): pseudo-inverse solve from the thin SVD of `A`.
//!
//! Before solving, the `x, y` regressors are optionally Hartley-normalized
//! (see [`crate::math::XyNormalization`]) and the result is mapped back.
//!
//! # Degeneracy
//!
//! Every solver reports the reciprocal condition number `rcond` of the
//! (normalized) design matrix. Collinear or coincident `(x, y)` samples make
//! `A` rank deficient; when `rcond` falls below
//! [`PlaneFitOptions::rcond_threshold`] the fit fails with
//! [`PlaneFitError::SingularMatrix`] instead of returning meaningless values.
//!
//! # Example
//!
//! ```
//! use sensor_geom_core::Pt3;
//! use sensor_geom_linear::estimate_params;
//!
//! let points = [Pt3::new(0.0, 0.0, 1.0), Pt3::new(1.0, 0.0, 2.0), Pt3::new(0.0, 1.0, 3.0)];
//! let plane = estimate_params(&points).unwrap();
//! assert!((plane.a - 1.0).abs() < 1e-9);
//! assert!((plane.b - 1.0).abs() < 1e-9);
//! assert!((plane.c - 2.0).abs() < 1e-9);
//! ```

use crate::math::{design_system, magnitude_ratio, XyNormalization};
use log::{debug, warn};
use nalgebra::{storage::Storage, DMatrix, DVector, Dim, Matrix};
use sensor_geom_core::{
    is_finite_point, sph_to_cart_batch, PlaneParams, Pt3, Real, SphericalMeasurement, Vec3,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Minimal number of points for a determined fit.
pub const MIN_POINTS: usize = 3;

/// Conditioning the normal equations can still resolve.
///
/// Forming `AᵀA` squares the condition number, so eigenvalue round-off of
/// order `ε·λ_max` hides anything below roughly `√ε` in `rcond`.
const NORMAL_EQUATIONS_RCOND_FLOOR: Real = 1e-6;

/// Errors that can occur during plane fitting.
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum PlaneFitError {
    /// Fewer than [`MIN_POINTS`] points.
    #[error("need at least 3 points to fit a plane, got {0}")]
    NotEnoughPoints(usize),
    /// Point matrix does not have exactly three columns.
    #[error("point matrix must have 3 columns (x, y, z), got {0}")]
    InvalidShape(usize),
    /// A point contains NaN or infinity.
    #[error("point {0} has a non-finite coordinate")]
    NonFinite(usize),
    /// The design matrix is singular or too ill-conditioned to trust.
    #[error("singular design matrix (rcond {rcond:.3e}): points are collinear or coincident in x/y")]
    SingularMatrix { rcond: Real },
    /// The decomposition or inversion itself failed.
    #[error("linear solve failed")]
    DecompositionFailed,
}

/// Coarse classification of [`PlaneFitError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FitErrorKind {
    /// The input cannot describe a plane regardless of its values.
    InvalidInput,
    /// The points are numerically degenerate.
    SingularMatrix,
}

impl PlaneFitError {
    pub fn kind(&self) -> FitErrorKind {
        match self {
            Self::NotEnoughPoints(_) | Self::InvalidShape(_) | Self::NonFinite(_) => {
                FitErrorKind::InvalidInput
            }
            Self::SingularMatrix { .. } | Self::DecompositionFailed => {
                FitErrorKind::SingularMatrix
            }
        }
    }
}

/// Linear least-squares solver used for the fit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeastSquaresMethod {
    /// Explicit inverse of `AᵀA`.
    NormalEquations,
    /// Householder QR of `A`.
    Qr,
    /// Thin SVD of `A`.
    #[default]
    Svd,
}

/// Options controlling plane estimation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaneFitOptions {
    /// Solver for the linear system.
    pub method: LeastSquaresMethod,

    /// Hartley-normalize the `x, y` regressors before solving.
    ///
    /// Leave enabled unless reproducing the raw reference computation; point
    /// clouds far from the origin are otherwise badly conditioned.
    pub normalize: bool,

    /// Reject fits whose design matrix has a reciprocal condition number
    /// below this value.
    pub rcond_threshold: Real,
}

impl Default for PlaneFitOptions {
    fn default() -> Self {
        Self {
            method: LeastSquaresMethod::Svd,
            normalize: true,
            rcond_threshold: 1e-10,
        }
    }
}

/// Result of a plane fit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlaneFit {
    /// Estimated plane.
    pub params: PlaneParams,
    /// Root mean square vertical residual over all points.
    pub rms_residual: Real,
    /// Reciprocal condition number of the design matrix actually solved.
    pub rcond: Real,
    /// Number of points used.
    pub num_points: usize,
}

/// Solver for plane estimation via closed-form methods.
pub struct PlaneFitSolver;

impl PlaneFitSolver {
    /// Fit a plane to Cartesian points.
    pub fn fit(points: &[Pt3], opts: &PlaneFitOptions) -> Result<PlaneFit, PlaneFitError> {
        if points.len() < MIN_POINTS {
            return Err(PlaneFitError::NotEnoughPoints(points.len()));
        }
        if let Some(idx) = points.iter().position(|p| !is_finite_point(p)) {
            return Err(PlaneFitError::NonFinite(idx));
        }

        let norm = if opts.normalize {
            XyNormalization::from_points(points).unwrap_or_else(XyNormalization::identity)
        } else {
            XyNormalization::identity()
        };
        let (a, z) = design_system(points, &norm);

        let (theta, rcond) = match opts.method {
            LeastSquaresMethod::NormalEquations => {
                solve_normal_equations(a, &z, opts.rcond_threshold)?
            }
            LeastSquaresMethod::Qr => solve_qr(a, &z, opts.rcond_threshold)?,
            LeastSquaresMethod::Svd => solve_svd(a, &z, opts.rcond_threshold)?,
        };

        let params = norm.denormalize(&PlaneParams::from_vector(&theta));
        let rms_residual = (residual_sum_of_squares(&params, points) / points.len() as Real).sqrt();
        debug!(
            "plane fit ({:?}, n={}): a={:.6} b={:.6} c={:.6}, rcond={:.3e}, rms={:.3e}",
            opts.method,
            points.len(),
            params.a,
            params.b,
            params.c,
            rcond,
            rms_residual
        );

        Ok(PlaneFit {
            params,
            rms_residual,
            rcond,
            num_points: points.len(),
        })
    }

    /// Fit a plane to an `n×3` matrix with one `[x, y, z]` point per row.
    ///
    /// Accepts any nalgebra matrix (static or dynamic shape, owned or a view).
    pub fn fit_matrix<R, C, S>(
        points: &Matrix<Real, R, C, S>,
        opts: &PlaneFitOptions,
    ) -> Result<PlaneFit, PlaneFitError>
    where
        R: Dim,
        C: Dim,
        S: Storage<Real, R, C>,
    {
        Self::fit(&points_from_matrix(points)?, opts)
    }

    /// Convert spherical measurements to the sensor frame and fit a plane.
    pub fn from_measurements(
        measurements: &[SphericalMeasurement],
        opts: &PlaneFitOptions,
    ) -> Result<PlaneFit, PlaneFitError> {
        Self::fit(&sph_to_cart_batch(measurements), opts)
    }
}

/// Estimate `(a, b, c)` with default options.
pub fn estimate_params(points: &[Pt3]) -> Result<PlaneParams, PlaneFitError> {
    PlaneFitSolver::fit(points, &PlaneFitOptions::default()).map(|fit| fit.params)
}

/// Estimate `(a, b, c)` from an `n×3` matrix with default options.
pub fn estimate_params_from_matrix<R, C, S>(
    points: &Matrix<Real, R, C, S>,
) -> Result<PlaneParams, PlaneFitError>
where
    R: Dim,
    C: Dim,
    S: Storage<Real, R, C>,
{
    PlaneFitSolver::fit_matrix(points, &PlaneFitOptions::default()).map(|fit| fit.params)
}

/// Read the rows of an `n×3` matrix as points.
pub fn points_from_matrix<R, C, S>(m: &Matrix<Real, R, C, S>) -> Result<Vec<Pt3>, PlaneFitError>
where
    R: Dim,
    C: Dim,
    S: Storage<Real, R, C>,
{
    if m.ncols() != 3 {
        return Err(PlaneFitError::InvalidShape(m.ncols()));
    }
    Ok((0..m.nrows())
        .map(|i| Pt3::new(m[(i, 0)], m[(i, 1)], m[(i, 2)]))
        .collect())
}

/// Signed vertical residual of every point.
pub fn residuals(params: &PlaneParams, points: &[Pt3]) -> Vec<Real> {
    points.iter().map(|p| params.residual(p)).collect()
}

/// Sum of squared vertical residuals.
pub fn residual_sum_of_squares(params: &PlaneParams, points: &[Pt3]) -> Real {
    points
        .iter()
        .map(|p| {
            let r = params.residual(p);
            r * r
        })
        .sum()
}

fn check_rcond(rcond: Real, threshold: Real) -> Result<(), PlaneFitError> {
    // NaN rcond fails the comparison and is rejected as well
    if rcond >= threshold {
        Ok(())
    } else {
        warn!("plane fit rejected: rcond {rcond:.3e} below {threshold:.3e}");
        Err(PlaneFitError::SingularMatrix { rcond })
    }
}

fn to_vec3(theta: &DVector<Real>) -> Result<Vec3, PlaneFitError> {
    if theta.len() != 3 || theta.iter().any(|v| !v.is_finite()) {
        return Err(PlaneFitError::DecompositionFailed);
    }
    Ok(Vec3::new(theta[0], theta[1], theta[2]))
}

fn solve_normal_equations(
    a: DMatrix<Real>,
    z: &DVector<Real>,
    threshold: Real,
) -> Result<(Vec3, Real), PlaneFitError> {
    let at = a.transpose();
    let ata = &at * &a;
    let atz = &at * z;

    // eigenvalues of AᵀA are the squared singular values of A
    let eigen = ata.clone().symmetric_eigen();
    let ratio = magnitude_ratio(eigen.eigenvalues.iter().copied());
    let rcond = ratio.sqrt();
    check_rcond(rcond, threshold.max(NORMAL_EQUATIONS_RCOND_FLOOR))?;

    let inv = ata.try_inverse().ok_or(PlaneFitError::DecompositionFailed)?;
    Ok((to_vec3(&(inv * atz))?, rcond))
}

fn solve_qr(
    a: DMatrix<Real>,
    z: &DVector<Real>,
    threshold: Real,
) -> Result<(Vec3, Real), PlaneFitError> {
    let qr = a.qr();
    let r = qr.r();
    let rcond = magnitude_ratio(r.diagonal().iter().copied());
    check_rcond(rcond, threshold)?;

    let qtz = qr.q().transpose() * z;
    let theta = r
        .solve_upper_triangular(&qtz)
        .ok_or(PlaneFitError::DecompositionFailed)?;
    Ok((to_vec3(&theta)?, rcond))
}

fn solve_svd(
    a: DMatrix<Real>,
    z: &DVector<Real>,
    threshold: Real,
) -> Result<(Vec3, Real), PlaneFitError> {
    let svd = a.svd(true, true);
    let rcond = magnitude_ratio(svd.singular_values.iter().copied());
    check_rcond(rcond, threshold)?;

    let theta = svd
        .solve(z, 0.0)
        .map_err(|_| PlaneFitError::DecompositionFailed)?;
    Ok((to_vec3(&theta)?, rcond))
}
