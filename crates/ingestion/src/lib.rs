//! Observation ingestion library.
//!
//! Gathers trace-gas column measurements from one or more sources (TEMPO
//! Level-2 granules or in-memory arrays) into a single flat list of
//! [`ObservationPoint`](geo_common::ObservationPoint)s.
//!
//! # Architecture
//!
//! - [`ObservationSource`]: anything that yields co-indexed value,
//!   latitude and longitude arrays
//! - [`PointCollector`]: validates array shapes, drops NaN measurements and
//!   concatenates every source
//! - [`discover_sources`]: sorted listing of granule files in a data directory
//! - [`VariablePacking`]: fill/missing markers and scale/offset unpacking
//! - `TempoNetCdfSource` (feature `netcdf`): reads a granule from disk

pub mod collector;
pub mod decode;
pub mod error;
#[cfg(feature = "netcdf")]
mod netcdf;
pub mod source;

// Re-exports
pub use collector::{CollectionSummary, PointCollector, SourceSummary};
pub use decode::VariablePacking;
pub use error::{IngestionError, Result};
#[cfg(feature = "netcdf")]
pub use netcdf::TempoNetCdfSource;
pub use source::{discover_sources, ObservationArrays, ObservationSource};
