//! Synthetic observation generators.
//!
//! Satellite pixels are irregularly placed, so the generators jitter a
//! lattice with a deterministic hash. Jitter keeps positions away from
//! exact collinearity and cocircularity while staying reproducible.

use geo_common::{BoundingBox, ObservationPoint};

/// Simple deterministic hash for reproducible test data.
fn simple_hash(x: u32, y: u32, seed: u32) -> u32 {
    let mut h = seed;
    h = h.wrapping_mul(31).wrapping_add(x);
    h = h.wrapping_mul(31).wrapping_add(y);
    h ^= h >> 16;
    h = h.wrapping_mul(0x85ebca6b);
    h ^= h >> 13;
    h = h.wrapping_mul(0xc2b2ae35);
    h ^= h >> 16;
    h
}

/// Deterministic value in `[-0.5, 0.5)`.
fn unit_jitter(x: u32, y: u32, seed: u32) -> f64 {
    (simple_hash(x, y, seed) % 10_000) as f64 / 10_000.0 - 0.5
}

/// Jittered lattice positions strictly inside `bbox`.
///
/// Produces `nx * ny` positions, one per lattice cell, each displaced from
/// the cell center by up to 40% of the cell size.
///
/// # Example
///
/// ```
/// use geo_common::BoundingBox;
/// use test_utils::scatter_positions;
///
/// let bbox = BoundingBox::new(0.0, 0.0, 1.0, 1.0);
/// let positions = scatter_positions(bbox, 4, 3, 7);
/// assert_eq!(positions.len(), 12);
/// assert!(positions.iter().all(|&(lon, lat)| bbox.contains(lon, lat)));
/// ```
pub fn scatter_positions(bbox: BoundingBox, nx: usize, ny: usize, seed: u32) -> Vec<(f64, f64)> {
    let dx = bbox.width() / nx as f64;
    let dy = bbox.height() / ny as f64;

    let mut positions = Vec::with_capacity(nx * ny);
    for row in 0..ny {
        for col in 0..nx {
            let jx = unit_jitter(col as u32, row as u32, seed) * 0.8;
            let jy = unit_jitter(row as u32, col as u32, seed.wrapping_add(1)) * 0.8;
            let lon = bbox.min_lon + (col as f64 + 0.5 + jx) * dx;
            let lat = bbox.min_lat + (row as f64 + 0.5 + jy) * dy;
            positions.push((lon, lat));
        }
    }
    positions
}

/// Observations sampled from a function of `(lon, lat)`.
pub fn scatter_observations<F>(
    bbox: BoundingBox,
    nx: usize,
    ny: usize,
    seed: u32,
    field: F,
) -> Vec<ObservationPoint>
where
    F: Fn(f64, f64) -> f64,
{
    scatter_positions(bbox, nx, ny, seed)
        .into_iter()
        .map(|(lon, lat)| ObservationPoint::new(field(lon, lat), lat, lon))
        .collect()
}

/// Observations of the plane `a + b * lon + c * lat`.
///
/// Linear interpolation reproduces a plane exactly inside the convex hull,
/// which makes interpolated values checkable.
pub fn plane_observations(
    bbox: BoundingBox,
    nx: usize,
    ny: usize,
    seed: u32,
    (a, b, c): (f64, f64, f64),
) -> Vec<ObservationPoint> {
    scatter_observations(bbox, nx, ny, seed, |lon, lat| a + b * lon + c * lat)
}

/// Flat `(values, latitudes, longitudes)` arrays resembling one granule.
///
/// Every `nan_every`-th value is NaN, like cloud-masked retrievals.
pub fn granule_arrays(
    bbox: BoundingBox,
    nx: usize,
    ny: usize,
    seed: u32,
    nan_every: usize,
) -> (Vec<f64>, Vec<f64>, Vec<f64>) {
    let positions = scatter_positions(bbox, nx, ny, seed);

    let mut values = Vec::with_capacity(positions.len());
    let mut lats = Vec::with_capacity(positions.len());
    let mut lons = Vec::with_capacity(positions.len());

    for (idx, (lon, lat)) in positions.into_iter().enumerate() {
        let value = if nan_every > 0 && idx % nan_every == 0 {
            f64::NAN
        } else {
            // Column densities of order 1e15 molecules/cm^2
            1.0e15 * (1.0 + unit_jitter(idx as u32, 0, seed))
        };
        values.push(value);
        lats.push(lat);
        lons.push(lon);
    }

    (values, lats, lons)
}
