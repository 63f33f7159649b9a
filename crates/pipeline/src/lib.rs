//! Trace-gas regridding pipeline.
//!
//! Ties the stages together for one study region:
//!
//! ```text
//! sources ─► PointCollector ─► RegionFilter ─► ScatteredInterpolator ─► GridMasker ─► RegionRaster
//! ```
//!
//! The selected boundary is resolved from the [`BoundaryCatalog`](region::BoundaryCatalog)
//! before any data is read. Every failure surfaces as a [`PipelineError`]
//! carrying the failing [`Stage`] and an [`ErrorKind`].

pub mod config;
pub mod error;
pub mod runner;
pub mod raster;

pub use config::{DataConfig, PipelineConfig};
pub use error::{ErrorKind, PipelineError, Result, Stage};
pub use runner::{Pipeline, PipelineOutput};
pub use raster::RegionRaster;
