//! Regular lat/lon grids and the fields defined on them.
//!
//! Cells are stored row-major: row `j` walks latitude from south to north,
//! column `i` walks longitude from west to east, and the flat index of a
//! cell is `j * nx + i`.

use serde::{Deserialize, Serialize};

use crate::error::{GeoError, GeoResult};
use crate::BoundingBox;

/// `n` evenly spaced values over `[start, stop]`, both ends included.
///
/// The final value is `stop` exactly so grid edges line up with the data
/// extent they were built from.
pub fn linspace(start: f64, stop: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (n - 1) as f64;
            let mut values: Vec<f64> = (0..n).map(|k| start + step * k as f64).collect();
            values[n - 1] = stop;
            values
        }
    }
}

/// Shape and extent of a regular lat/lon grid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridSpec {
    /// Number of points in X (longitude) direction
    pub nx: usize,
    /// Number of points in Y (latitude) direction
    pub ny: usize,
    /// Extent spanned by the outermost grid points
    pub bbox: BoundingBox,
}

impl GridSpec {
    /// Create a grid spanning `bbox` with `nx` by `ny` points.
    pub fn new(nx: usize, ny: usize, bbox: BoundingBox) -> GeoResult<Self> {
        if nx < 2 || ny < 2 {
            return Err(GeoError::InvalidResolution { nx, ny });
        }
        if !(bbox.width() >= 0.0 && bbox.height() >= 0.0) {
            return Err(GeoError::InvalidExtent(format!("{:?}", bbox)));
        }
        Ok(Self { nx, ny, bbox })
    }

    /// Grid spacing in degrees (lon, lat).
    pub fn resolution(&self) -> (f64, f64) {
        (
            self.bbox.width() / (self.nx - 1) as f64,
            self.bbox.height() / (self.ny - 1) as f64,
        )
    }

    /// Longitudes of the grid columns.
    pub fn longitudes(&self) -> Vec<f64> {
        linspace(self.bbox.min_lon, self.bbox.max_lon, self.nx)
    }

    /// Latitudes of the grid rows.
    pub fn latitudes(&self) -> Vec<f64> {
        linspace(self.bbox.min_lat, self.bbox.max_lat, self.ny)
    }

    /// Get the 1D array index for a 2D grid position.
    pub fn flat_index(&self, i: usize, j: usize) -> usize {
        j * self.nx + i
    }

    /// Total number of grid points.
    pub fn len(&self) -> usize {
        self.nx * self.ny
    }

    pub fn is_empty(&self) -> bool {
        self.nx == 0 || self.ny == 0
    }

    /// Materialise the full 2-D coordinate mesh.
    pub fn mesh(&self) -> GridMesh {
        let lons = self.longitudes();
        let lats = self.latitudes();

        let mut grid_lon = Vec::with_capacity(self.len());
        let mut grid_lat = Vec::with_capacity(self.len());
        for &lat in &lats {
            for &lon in &lons {
                grid_lon.push(lon);
                grid_lat.push(lat);
            }
        }

        GridMesh {
            spec: *self,
            grid_lon,
            grid_lat,
        }
    }
}

/// Cell-center coordinates of every grid point, co-indexed with a field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridMesh {
    pub spec: GridSpec,
    /// Longitude of each cell, row-major.
    pub grid_lon: Vec<f64>,
    /// Latitude of each cell, row-major.
    pub grid_lat: Vec<f64>,
}

impl GridMesh {
    pub fn nx(&self) -> usize {
        self.spec.nx
    }

    pub fn ny(&self) -> usize {
        self.spec.ny
    }

    pub fn len(&self) -> usize {
        self.grid_lon.len()
    }

    pub fn is_empty(&self) -> bool {
        self.grid_lon.is_empty()
    }

    /// `(lon, lat)` of the cell at column `i`, row `j`.
    pub fn coord(&self, i: usize, j: usize) -> Option<(f64, f64)> {
        if i >= self.spec.nx || j >= self.spec.ny {
            return None;
        }
        let idx = self.spec.flat_index(i, j);
        Some((self.grid_lon[idx], self.grid_lat[idx]))
    }

    /// Iterate `(flat_index, lon, lat)` over every cell.
    pub fn cells(&self) -> impl Iterator<Item = (usize, f64, f64)> + '_ {
        self.grid_lon
            .iter()
            .zip(&self.grid_lat)
            .enumerate()
            .map(|(idx, (&lon, &lat))| (idx, lon, lat))
    }

}

/// Estimated values co-indexed with a [`GridMesh`]. NaN marks "no value".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GriddedField {
    pub nx: usize,
    pub ny: usize,
    /// Row-major values; `NaN` where there is no estimate.
    pub data: Vec<f64>,
}

impl GriddedField {
    /// Wrap existing values, checking they fill an `nx` by `ny` grid.
    pub fn new(nx: usize, ny: usize, data: Vec<f64>) -> GeoResult<Self> {
        if data.len() != nx * ny {
            return Err(GeoError::ShapeMismatch {
                expected: nx * ny,
                actual: data.len(),
            });
        }
        Ok(Self { nx, ny, data })
    }

    /// A field with every cell set to NaN.
    pub fn empty(nx: usize, ny: usize) -> Self {
        Self {
            nx,
            ny,
            data: vec![f64::NAN; nx * ny],
        }
    }

    /// Get the value at a specific grid coordinate.
    pub fn get(&self, i: usize, j: usize) -> Option<f64> {
        if i >= self.nx || j >= self.ny {
            return None;
        }
        Some(self.data[j * self.nx + i])
    }

    /// Iterate the rows from south to north.
    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        self.data.chunks(self.nx.max(1))
    }

    /// Number of cells holding a value.
    pub fn valid_count(&self) -> usize {
        self.data.iter().filter(|v| !v.is_nan()).count()
    }

    /// Summary statistics over the non-NaN cells.
    pub fn stats(&self) -> Option<FieldStats> {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        let mut sum = 0.0;
        let mut count = 0usize;

        for &v in self.data.iter().filter(|v| !v.is_nan()) {
            min = min.min(v);
            max = max.max(v);
            sum += v;
            count += 1;
        }

        if count == 0 {
            return None;
        }

        Some(FieldStats {
            min,
            max,
            mean: sum / count as f64,
            valid_cells: count,
            total_cells: self.data.len(),
        })
    }

    /// True when both fields have equal shape and every cell is equal,
    /// treating NaN as equal to NaN.
    pub fn same_values(&self, other: &GriddedField) -> bool {
        self.nx == other.nx
            && self.ny == other.ny
            && self
                .data
                .iter()
                .zip(&other.data)
                .all(|(a, b)| (a.is_nan() && b.is_nan()) || a == b)
    }
}

/// Summary of the valid cells of a field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldStats {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub valid_cells: usize,
    pub total_cells: usize,
}
