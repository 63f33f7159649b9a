//! Common types and utilities shared across the regridding workspace.
//!
//! Everything here is expressed in a single geographic reference frame:
//! decimal degrees of longitude (x) and latitude (y).

pub mod bbox;
pub mod error;
pub mod grid;
pub mod observation;

pub use bbox::BoundingBox;
pub use error::{GeoError, GeoResult};
pub use grid::{linspace, FieldStats, GridMesh, GridSpec, GriddedField};
pub use observation::{FilteredPointSet, ObservationPoint};
