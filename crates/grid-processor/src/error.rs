//! Error types for grid processing.

use geo_common::GeoError;
use thiserror::Error;

/// Errors that can occur during interpolation and masking.
#[derive(Error, Debug)]
pub enum GridError {
    /// No observations survived region filtering.
    #[error("no observations to interpolate: the filtered point set is empty")]
    EmptyPointSet,

    /// The observations cannot support a triangulation.
    #[error("degenerate geometry ({distinct_positions} distinct positions): {reason}")]
    DegenerateGeometry {
        distinct_positions: usize,
        reason: String,
    },

    /// Mesh and field do not describe the same grid.
    #[error("grid shape mismatch: mesh is {mesh_nx}x{mesh_ny}, field is {field_nx}x{field_ny}")]
    ShapeMismatch {
        mesh_nx: usize,
        mesh_ny: usize,
        field_nx: usize,
        field_ny: usize,
    },

    /// Configuration error.
    #[error("configuration error: {0}")]
    ConfigError(String),

    /// Invalid grid construction.
    #[error(transparent)]
    Geo(#[from] GeoError),
}

impl GridError {
    /// Create a DegenerateGeometry error.
    pub fn degenerate(distinct_positions: usize, reason: impl Into<String>) -> Self {
        Self::DegenerateGeometry {
            distinct_positions,
            reason: reason.into(),
        }
    }

    /// Create a ConfigError.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }
}

/// Result type for grid processor operations.
pub type Result<T> = std::result::Result<T, GridError>;
