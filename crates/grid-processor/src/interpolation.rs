//! Scattered observations onto a regular lat/lon grid.

use std::collections::HashSet;
use std::time::Instant;

use geo_common::{BoundingBox, FilteredPointSet, GridMesh, GridSpec, GriddedField};
use rstar::primitives::GeomWithData;
use rstar::RTree;
use tracing::{debug, info};

use crate::config::RegridConfig;
use crate::error::{GridError, Result};
use crate::triangulation::{check_non_degenerate, Triangulation};
use crate::types::InterpolationMethod;

/// Observation stored in the nearest-neighbour index.
type IndexedValue = GeomWithData<[f64; 2], f64>;

/// Estimates a value at every cell of a regular grid spanning the
/// observations' extent.
#[derive(Debug, Clone, Copy)]
pub struct ScatteredInterpolator {
    nx: usize,
    ny: usize,
    method: InterpolationMethod,
}

impl Default for ScatteredInterpolator {
    fn default() -> Self {
        Self::from_config(&RegridConfig::default())
    }
}

impl ScatteredInterpolator {
    pub fn new(nx: usize, ny: usize, method: InterpolationMethod) -> Self {
        Self { nx, ny, method }
    }

    pub fn from_config(config: &RegridConfig) -> Self {
        Self::new(config.nx, config.ny, config.interpolation)
    }

    pub fn method(&self) -> InterpolationMethod {
        self.method
    }

    /// Interpolate `points` onto an `nx` by `ny` grid.
    ///
    /// The grid spans exactly the min/max longitude and latitude of the
    /// points. With the linear method, cells outside the convex hull of the
    /// points are NaN. Repeated positions keep the first observation.
    pub fn interpolate(&self, points: &FilteredPointSet) -> Result<(GridMesh, GriddedField)> {
        let start = Instant::now();

        let bbox = points.bbox().ok_or(GridError::EmptyPointSet)?;
        let (positions, values) = distinct_positions(points);
        if positions.len() < points.len() {
            debug!(
                duplicates = points.len() - positions.len(),
                "Dropped repeated observation positions"
            );
        }
        check_non_degenerate(&positions)?;

        let mesh = self.grid_for(bbox)?.mesh();
        let data = match self.method {
            InterpolationMethod::Linear => {
                let triangulation = Triangulation::new(&positions, &values)?;
                debug!(
                    triangles = triangulation.triangle_count(),
                    "Triangulated observations"
                );
                mesh.cells()
                    .map(|(_, lon, lat)| triangulation.interpolate(lon, lat).unwrap_or(f64::NAN))
                    .collect()
            }
            InterpolationMethod::Nearest => {
                let index: RTree<IndexedValue> = RTree::bulk_load(
                    positions
                        .iter()
                        .zip(&values)
                        .map(|(&(lon, lat), &v)| GeomWithData::new([lon, lat], v))
                        .collect(),
                );
                mesh.cells()
                    .map(|(_, lon, lat)| {
                        index
                            .nearest_neighbor(&[lon, lat])
                            .map_or(f64::NAN, |nearest| nearest.data)
                    })
                    .collect()
            }
        };

        let field = GriddedField::new(mesh.nx(), mesh.ny(), data)?;

        info!(
            points = points.len(),
            distinct = positions.len(),
            nx = self.nx,
            ny = self.ny,
            method = %self.method,
            valid_cells = field.valid_count(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Interpolated observations onto grid"
        );

        Ok((mesh, field))
    }

    fn grid_for(&self, bbox: BoundingBox) -> Result<GridSpec> {
        Ok(GridSpec::new(self.nx, self.ny, bbox)?)
    }
}

/// Positions with duplicates removed, keeping the first value seen.
fn distinct_positions(points: &FilteredPointSet) -> (Vec<(f64, f64)>, Vec<f64>) {
    let mut seen: HashSet<(u64, u64)> = HashSet::with_capacity(points.len());
    let mut positions = Vec::with_capacity(points.len());
    let mut values = Vec::with_capacity(points.len());

    for point in points.iter() {
        // +0.0 folds -0.0 into the same key
        let key = (
            (point.longitude + 0.0).to_bits(),
            (point.latitude + 0.0).to_bits(),
        );
        if seen.insert(key) {
            positions.push((point.longitude, point.latitude));
            values.push(point.value);
        }
    }

    (positions, values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo_common::ObservationPoint;

    fn set(points: &[ObservationPoint]) -> FilteredPointSet {
        points.iter().collect()
    }

    #[test]
    fn test_empty_set() {
        let result = ScatteredInterpolator::default().interpolate(&FilteredPointSet::new());
        assert!(matches!(result, Err(GridError::EmptyPointSet)));
    }

    #[test]
    fn test_duplicates_keep_first() {
        let points = set(&[
            ObservationPoint::new(1.0, 0.0, 0.0),
            ObservationPoint::new(9.0, 0.0, 0.0),
            ObservationPoint::new(2.0, 0.0, 1.0),
        ]);
        let (positions, values) = distinct_positions(&points);
        assert_eq!(positions, vec![(0.0, 0.0), (1.0, 0.0)]);
        assert_eq!(values, vec![1.0, 2.0]);
    }

    #[test]
    fn test_duplicates_reduce_below_three() {
        let points = set(&[
            ObservationPoint::new(1.0, 0.0, 0.0),
            ObservationPoint::new(2.0, 0.0, 0.0),
            ObservationPoint::new(3.0, 1.0, 1.0),
        ]);
        let result = ScatteredInterpolator::new(5, 5, InterpolationMethod::Linear).interpolate(&points);
        assert!(matches!(
            result,
            Err(GridError::DegenerateGeometry { distinct_positions: 2, .. })
        ));
    }

    #[test]
    fn test_grid_spans_point_extent() {
        let points = set(&[
            ObservationPoint::new(1.0, 28.0, -98.0),
            ObservationPoint::new(2.0, 29.0, -98.0),
            ObservationPoint::new(3.0, 28.0, -97.0),
            ObservationPoint::new(4.0, 29.0, -97.0),
        ]);
        let (mesh, field) = ScatteredInterpolator::new(3, 5, InterpolationMethod::Linear)
            .interpolate(&points)
            .unwrap();

        assert_eq!(mesh.len(), 15);
        assert_eq!(field.data.len(), 15);
        assert_eq!(mesh.coord(0, 0), Some((-98.0, 28.0)));
        assert_eq!(mesh.coord(2, 4), Some((-97.0, 29.0)));
        // Corners are data points.
        assert!((field.get(2, 4).unwrap() - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_nearest_method() {
        let points = set(&[
            ObservationPoint::new(1.0, 0.0, 0.0),
            ObservationPoint::new(2.0, 0.0, 1.0),
            ObservationPoint::new(3.0, 1.0, 0.0),
        ]);
        let (_, field) = ScatteredInterpolator::new(11, 11, InterpolationMethod::Nearest)
            .interpolate(&points)
            .unwrap();

        // Nearest fills the whole grid, including outside the hull.
        assert_eq!(field.valid_count(), 121);
        assert_eq!(field.get(0, 0), Some(1.0));
        assert_eq!(field.get(10, 0), Some(2.0));
        assert_eq!(field.get(0, 10), Some(3.0));
        assert_eq!(field.get(10, 10).map(|v| v.is_nan()), Some(false));
    }
}
