//! The masked raster handed to the rendering side.

use chrono::{DateTime, Utc};
use geo_common::{BoundingBox, FieldStats, GridMesh, GriddedField};
use grid_processor::InterpolationMethod;
use serde::{Deserialize, Serialize};

/// A masked grid plus everything needed to draw it over a map.
///
/// `values` holds one row per latitude, south to north; `None` marks a
/// cell with no value (serialised as JSON `null`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionRaster {
    pub region: String,
    pub interpolation: InterpolationMethod,
    pub generated_at: DateTime<Utc>,
    pub nx: usize,
    pub ny: usize,
    /// Extent spanned by the grid.
    pub grid_extent: BoundingBox,
    /// Extent of the region boundary, used to frame the map.
    pub boundary_extent: BoundingBox,
    pub longitudes: Vec<f64>,
    pub latitudes: Vec<f64>,
    pub values: Vec<Vec<Option<f64>>>,
    pub stats: Option<FieldStats>,
}

impl RegionRaster {
    pub fn new(
        region: impl Into<String>,
        interpolation: InterpolationMethod,
        mesh: &GridMesh,
        field: &GriddedField,
        boundary_extent: BoundingBox,
    ) -> Self {
        let values = field
            .rows()
            .map(|row| {
                row.iter()
                    .map(|&v| if v.is_nan() { None } else { Some(v) })
                    .collect()
            })
            .collect();

        Self {
            region: region.into(),
            interpolation,
            generated_at: Utc::now(),
            nx: field.nx,
            ny: field.ny,
            grid_extent: mesh.spec.bbox,
            boundary_extent,
            longitudes: mesh.spec.longitudes(),
            latitudes: mesh.spec.latitudes(),
            values,
            stats: field.stats(),
        }
    }

    /// Value at column `i`, row `j`.
    pub fn get(&self, i: usize, j: usize) -> Option<f64> {
        self.values.get(j)?.get(i).copied().flatten()
    }

    /// Serialise to pretty-printed JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo_common::GridSpec;

    #[test]
    fn test_nan_cells_become_null() {
        let mesh = GridSpec::new(2, 2, BoundingBox::new(0.0, 0.0, 1.0, 1.0))
            .unwrap()
            .mesh();
        let field = GriddedField::new(2, 2, vec![1.0, f64::NAN, 3.0, 4.0]).unwrap();
        let raster = RegionRaster::new(
            "unit",
            InterpolationMethod::Linear,
            &mesh,
            &field,
            BoundingBox::new(0.0, 0.0, 1.0, 1.0),
        );

        assert_eq!(raster.get(0, 0), Some(1.0));
        assert_eq!(raster.get(1, 0), None);
        assert_eq!(raster.get(0, 1), Some(3.0));
        assert_eq!(raster.stats.map(|s| s.valid_cells), Some(3));

        let json: serde_json::Value = serde_json::from_str(&raster.to_json().unwrap()).unwrap();
        assert!(json["values"][0][1].is_null());
        assert_eq!(json["interpolation"], "linear");
        assert_eq!(json["latitudes"][1], 1.0);
    }
}
