//! Synthetic samples of planar surfaces.

use crate::{PlaneParams, Pt3, Real, SphericalMeasurement};
use anyhow::Result;
use rand::{rngs::StdRng, Rng, SeedableRng};

/// `n` points drawn uniformly from the unit cube `[0, 1)³`.
pub fn random_unit_cube(n: usize, seed: u64) -> Vec<Pt3> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n)
        .map(|_| Pt3::new(rng.random(), rng.random(), rng.random()))
        .collect()
}

/// Exact points on `plane` over an `nx * ny` grid centred at the origin.
///
/// Points are ordered row-major (Y major).
pub fn plane_points_grid(plane: &PlaneParams, nx: usize, ny: usize, spacing: Real) -> Vec<Pt3> {
    let x0 = -0.5 * nx.saturating_sub(1) as Real * spacing;
    let y0 = -0.5 * ny.saturating_sub(1) as Real * spacing;
    let mut points = Vec::with_capacity(nx.saturating_mul(ny));
    for j in 0..ny {
        for i in 0..nx {
            let x = x0 + i as Real * spacing;
            let y = y0 + j as Real * spacing;
            points.push(plane.point_at(x, y));
        }
    }
    points
}

/// `n` samples of `plane` with `x, y` uniform in `[-extent, extent]` and
/// uniform zero-mean height noise in `[-noise, noise]`.
pub fn plane_points_random(
    plane: &PlaneParams,
    n: usize,
    extent: Real,
    noise: Real,
    seed: u64,
) -> Vec<Pt3> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n)
        .map(|_| {
            let x = rng.random_range(-extent..=extent);
            let y = rng.random_range(-extent..=extent);
            let dz = if noise > 0.0 {
                rng.random_range(-noise..=noise)
            } else {
                0.0
            };
            Pt3::new(x, y, plane.height_at(x, y) + dz)
        })
        .collect()
}

/// Ray-cast a sensor at the origin against `plane`.
///
/// Every `(elevation, azimuth)` pair is traced; rays that hit the plane at
/// `0 < r <= max_range` produce a measurement. Output order follows
/// `elevations` (outer) then `azimuths` (inner).
pub fn scan_plane(
    plane: &PlaneParams,
    elevations: &[Real],
    azimuths: &[Real],
    max_range: Real,
) -> Result<Vec<SphericalMeasurement>> {
    let mut scan = Vec::with_capacity(elevations.len() * azimuths.len());
    for &elevation in elevations {
        for &azimuth in azimuths {
            let dir = SphericalMeasurement::new(elevation, azimuth, 1.0).direction();
            // r * dz = a + r * (b * dx + c * dy)
            let denom = dir.z - plane.b * dir.x - plane.c * dir.y;
            if denom.abs() < 1e-12 {
                continue;
            }
            let range = plane.a / denom;
            if range > 0.0 && range <= max_range {
                scan.push(SphericalMeasurement::new(elevation, azimuth, range));
            }
        }
    }
    if scan.is_empty() {
        anyhow::bail!(
            "no ray out of {} hits the plane within {max_range} m",
            elevations.len() * azimuths.len()
        );
    }
    Ok(scan)
}

/// `count` evenly spaced angles from `start` to `end` inclusive.
pub fn linspace(start: Real, end: Real, count: usize) -> Vec<Real> {
    match count {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (count - 1) as Real;
            (0..count).map(|i| start + step * i as Real).collect()
        }
    }
}
