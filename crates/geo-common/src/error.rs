//! Error types for the common geographic types.

use thiserror::Error;

/// Result type alias using GeoError.
pub type GeoResult<T> = Result<T, GeoError>;

/// Errors raised while constructing grids and fields.
#[derive(Debug, Error)]
pub enum GeoError {
    #[error("Invalid grid resolution {nx}x{ny}: both axes need at least 2 points")]
    InvalidResolution { nx: usize, ny: usize },

    #[error("Invalid extent: {0}")]
    InvalidExtent(String),

    #[error("Field shape mismatch: expected {expected} cells, got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },
}
