//! Re-masking an interpolated grid to the study region.
//!
//! Interpolation fills the convex hull of the observations, which can bulge
//! past a concave region. The mask re-tests every cell against the region
//! union, blanks the cells outside, and clamps negative estimates.

use geo_common::{GridMesh, GriddedField};
use region::{EdgePolicy, RegionBoundary};
use tracing::info;

use crate::config::RegridConfig;
use crate::error::{GridError, Result};

/// Cell counts from one masking pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MaskSummary {
    /// Cells outside the region, set to NaN.
    pub masked: usize,
    /// Inside cells raised from a negative value to 0.
    pub clamped: usize,
    /// Cells holding a value after masking.
    pub valid: usize,
}

/// Applies the region mask and non-negativity clamp to a gridded field.
#[derive(Debug, Clone, Copy)]
pub struct GridMasker {
    policy: EdgePolicy,
    clamp_negative: bool,
}

impl Default for GridMasker {
    fn default() -> Self {
        Self::from_config(&RegridConfig::default())
    }
}

impl GridMasker {
    pub fn new(policy: EdgePolicy, clamp_negative: bool) -> Self {
        Self {
            policy,
            clamp_negative,
        }
    }

    pub fn from_config(config: &RegridConfig) -> Self {
        Self::new(config.grid_edge_policy, config.clamp_negative)
    }

    /// Mask `field` to `boundary`, returning a new field.
    ///
    /// Applying the mask to its own output changes nothing.
    pub fn apply(
        &self,
        mesh: &GridMesh,
        field: &GriddedField,
        boundary: &RegionBoundary,
    ) -> Result<GriddedField> {
        self.apply_with_summary(mesh, field, boundary)
            .map(|(masked, _)| masked)
    }

    /// Like [`GridMasker::apply`], also reporting how many cells changed.
    pub fn apply_with_summary(
        &self,
        mesh: &GridMesh,
        field: &GriddedField,
        boundary: &RegionBoundary,
    ) -> Result<(GriddedField, MaskSummary)> {
        if mesh.nx() != field.nx || mesh.ny() != field.ny || mesh.len() != field.data.len() {
            return Err(GridError::ShapeMismatch {
                mesh_nx: mesh.nx(),
                mesh_ny: mesh.ny(),
                field_nx: field.nx,
                field_ny: field.ny,
            });
        }

        let bbox = boundary.bbox();
        let mut summary = MaskSummary::default();

        let data = mesh
            .cells()
            .map(|(idx, lon, lat)| {
                let inside = bbox.contains(lon, lat) && boundary.contains(lon, lat, self.policy);
                if !inside {
                    summary.masked += 1;
                    return f64::NAN;
                }

                let value = field.data[idx];
                if self.clamp_negative && value < 0.0 {
                    summary.clamped += 1;
                    0.0
                } else {
                    value
                }
            })
            .collect::<Vec<f64>>();

        let masked = GriddedField::new(field.nx, field.ny, data)?;
        summary.valid = masked.valid_count();

        info!(
            cells = masked.data.len(),
            masked = summary.masked,
            clamped = summary.clamped,
            valid = summary.valid,
            policy = %self.policy,
            "Masked grid to region"
        );

        Ok((masked, summary))
    }
}
