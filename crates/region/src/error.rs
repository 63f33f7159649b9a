//! Error types for region boundaries.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading or selecting a region boundary.
#[derive(Error, Debug)]
pub enum RegionError {
    /// Invalid WKT text.
    #[error("Invalid WKT format: {0}")]
    InvalidWkt(String),

    /// Invalid or unsupported GeoJSON document.
    #[error("Invalid GeoJSON: {0}")]
    InvalidGeoJson(String),

    /// Coordinate could not be parsed as a number.
    #[error("Invalid coordinate value: {0}")]
    InvalidCoordinate(String),

    /// Coordinate outside the geographic range.
    #[error("Coordinate out of range: {0}")]
    OutOfRange(String),

    /// Ring with too few vertices or non-finite coordinates.
    #[error("Invalid polygon ring: {0}")]
    InvalidRing(String),

    /// The boundary source produced no polygons.
    #[error("Boundary contains no polygons")]
    EmptyBoundary,

    /// The requested boundary name is not in the catalog.
    #[error("Region not found: '{name}' (available: {})", .available.join(", "))]
    RegionNotFound { name: String, available: Vec<String> },

    /// Failed to read or decode a shapefile.
    #[error("Failed to read shapefile {path:?}: {message}")]
    Shapefile { path: PathBuf, message: String },

    /// Failed to read a boundary file.
    #[error("Failed to read boundary file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl From<serde_json::Error> for RegionError {
    fn from(err: serde_json::Error) -> Self {
        RegionError::InvalidGeoJson(err.to_string())
    }
}

/// Result type for region operations.
pub type Result<T> = std::result::Result<T, RegionError>;
