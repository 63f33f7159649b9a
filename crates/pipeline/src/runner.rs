//! The collect → filter → interpolate → mask run.

use std::time::Instant;

use geo_common::{GridMesh, GriddedField};
use grid_processor::{GridMasker, MaskSummary, ScatteredInterpolator};
use ingestion::{CollectionSummary, ObservationSource, PointCollector};
use region::{RegionBoundary, RegionFilter};
use tracing::{debug, info};

use crate::config::{DataConfig, PipelineConfig};
use crate::error::{PipelineError, Result};
use crate::raster::RegionRaster;

/// Everything a successful run produces.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub raster: RegionRaster,
    pub mesh: GridMesh,
    /// The masked field.
    pub field: GriddedField,
    pub collection: CollectionSummary,
    /// Observations left after region filtering.
    pub filtered_points: usize,
    pub mask: MaskSummary,
}

/// Runs the four stages for one configured region.
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    /// Validate `config` and build a pipeline from it.
    pub fn new(config: PipelineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Load the selected boundary from the catalog.
    pub fn resolve_region(&self) -> Result<RegionBoundary> {
        Ok(self.config.regions.load(&self.config.selected_region)?)
    }

    /// Run every stage over `sources`.
    ///
    /// The region is resolved before any source is read, so an unknown
    /// region name fails without touching the data.
    pub fn run(&self, sources: &[Box<dyn ObservationSource>]) -> Result<PipelineOutput> {
        let boundary = self.resolve_region()?;
        self.run_with_boundary(&boundary, sources)
    }

    /// Run every stage over `sources` against an already loaded boundary.
    pub fn run_with_boundary(
        &self,
        boundary: &RegionBoundary,
        sources: &[Box<dyn ObservationSource>],
    ) -> Result<PipelineOutput> {
        let start = Instant::now();
        let regrid = &self.config.regrid;

        let (points, collection) = PointCollector::new().collect(sources)?;

        let filtered = RegionFilter::new(boundary, self.config.point_edge_policy).filter(&points);
        debug!(
            collected = points.len(),
            filtered = filtered.len(),
            "Region filter complete"
        );

        let (mesh, field) = ScatteredInterpolator::from_config(regrid)
            .interpolate(&filtered)
            .map_err(PipelineError::Interpolation)?;

        let (masked, mask) = GridMasker::from_config(regrid)
            .apply_with_summary(&mesh, &field, boundary)
            .map_err(PipelineError::Masking)?;

        let raster = RegionRaster::new(
            self.config.selected_region.clone(),
            regrid.interpolation,
            &mesh,
            &masked,
            boundary.bbox(),
        );

        info!(
            region = %self.config.selected_region,
            sources = collection.sources.len(),
            collected = collection.total_kept,
            filtered = filtered.len(),
            valid_cells = mask.valid,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Pipeline run complete"
        );

        Ok(PipelineOutput {
            raster,
            mesh,
            field: masked,
            collection,
            filtered_points: filtered.len(),
            mask,
        })
    }

    /// Granule sources named by the data section of the config.
    ///
    /// Files found in `data.dir` come first in sorted order, followed by
    /// the explicit `data.files`.
    #[cfg(feature = "netcdf")]
    pub fn configured_sources(&self) -> Result<Vec<Box<dyn ObservationSource>>> {
        use ingestion::{discover_sources, TempoNetCdfSource};

        let data = self.data_config()?;
        let mut paths = match &data.dir {
            Some(dir) => discover_sources(dir, &data.extension)?,
            None => Vec::new(),
        };
        paths.extend(data.files.iter().cloned());

        if paths.is_empty() {
            return Err(PipelineError::invalid_config(
                "no granule files found; set data.dir or data.files",
            ));
        }

        info!(granules = paths.len(), "Resolved granule sources");
        Ok(paths
            .into_iter()
            .map(|path| Box::new(TempoNetCdfSource::new(path)) as Box<dyn ObservationSource>)
            .collect())
    }

    /// Granule reading needs the `netcdf` feature.
    #[cfg(not(feature = "netcdf"))]
    pub fn configured_sources(&self) -> Result<Vec<Box<dyn ObservationSource>>> {
        self.data_config()?;
        Err(PipelineError::invalid_config(
            "granule reading requires the `netcdf` feature",
        ))
    }

    fn data_config(&self) -> Result<&DataConfig> {
        let data = &self.config.data;
        if data.is_empty() {
            return Err(PipelineError::invalid_config(
                "no granule sources configured; set data.dir or data.files",
            ));
        }
        Ok(data)
    }
}
