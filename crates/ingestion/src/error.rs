//! Error types for the ingestion crate.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur during ingestion.
#[derive(Error, Debug)]
pub enum IngestionError {
    #[error(
        "Input shape mismatch in source '{source_name}': \
         {values} values, {latitudes} latitudes, {longitudes} longitudes"
    )]
    InputShapeMismatch {
        source_name: String,
        values: usize,
        latitudes: usize,
        longitudes: usize,
    },

    #[error("Failed to scan data directory {path}: {message}")]
    Discovery { path: PathBuf, message: String },

    #[error("Failed to parse NetCDF data: {0}")]
    NetcdfParse(String),

    #[error("Missing variable '{variable}' in {path}")]
    MissingVariable { path: PathBuf, variable: String },
}

impl IngestionError {
    /// Create an InputShapeMismatch error for a source.
    pub fn shape_mismatch(
        source_name: impl Into<String>,
        values: usize,
        latitudes: usize,
        longitudes: usize,
    ) -> Self {
        Self::InputShapeMismatch {
            source_name: source_name.into(),
            values,
            latitudes,
            longitudes,
        }
    }
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestionError>;
