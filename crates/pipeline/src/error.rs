//! Pipeline error types.
//!
//! Every stage error is wrapped in [`PipelineError`], which records the
//! stage that failed and classifies the failure as an [`ErrorKind`].

use std::path::PathBuf;

use grid_processor::GridError;
use ingestion::IngestionError;
use region::RegionError;
use thiserror::Error;

/// The pipeline stage an error came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Configuration,
    BoundarySelection,
    Collection,
    Interpolation,
    Masking,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Configuration => "configuration",
            Self::BoundarySelection => "boundary_selection",
            Self::Collection => "collection",
            Self::Interpolation => "interpolation",
            Self::Masking => "masking",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Caller-facing classification of a pipeline failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidConfig,
    RegionNotFound,
    InvalidBoundary,
    InputShapeMismatch,
    SourceRead,
    EmptyPointSet,
    DegenerateGeometry,
    GridShape,
}

/// Errors from a pipeline run.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Failed to read config file {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Boundary selection failed: {0}")]
    Boundary(#[from] RegionError),

    #[error("Collection failed: {0}")]
    Collection(#[from] IngestionError),

    #[error("Interpolation failed: {0}")]
    Interpolation(#[source] GridError),

    #[error("Masking failed: {0}")]
    Masking(#[source] GridError),
}

impl PipelineError {
    /// Create an InvalidConfig error.
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// The stage that failed.
    pub fn stage(&self) -> Stage {
        match self {
            Self::ConfigRead { .. } | Self::ConfigParse { .. } | Self::InvalidConfig(_) => {
                Stage::Configuration
            }
            Self::Boundary(_) => Stage::BoundarySelection,
            Self::Collection(_) => Stage::Collection,
            Self::Interpolation(_) => Stage::Interpolation,
            Self::Masking(_) => Stage::Masking,
        }
    }

    /// What went wrong, independent of the message text.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ConfigRead { .. } | Self::ConfigParse { .. } | Self::InvalidConfig(_) => {
                ErrorKind::InvalidConfig
            }
            Self::Boundary(RegionError::RegionNotFound { .. }) => ErrorKind::RegionNotFound,
            Self::Boundary(_) => ErrorKind::InvalidBoundary,
            Self::Collection(IngestionError::InputShapeMismatch { .. }) => {
                ErrorKind::InputShapeMismatch
            }
            Self::Collection(_) => ErrorKind::SourceRead,
            Self::Interpolation(err) | Self::Masking(err) => match err {
                GridError::EmptyPointSet => ErrorKind::EmptyPointSet,
                GridError::DegenerateGeometry { .. } => ErrorKind::DegenerateGeometry,
                GridError::ConfigError(_) => ErrorKind::InvalidConfig,
                GridError::ShapeMismatch { .. } | GridError::Geo(_) => ErrorKind::GridShape,
            },
        }
    }
}

/// Result type for pipeline operations.
pub type Result<T> = std::result::Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_not_found_kind() {
        let err = PipelineError::from(RegionError::RegionNotFound {
            name: "harris_county".to_string(),
            available: vec!["karnes_county".to_string()],
        });
        assert_eq!(err.stage(), Stage::BoundarySelection);
        assert_eq!(err.kind(), ErrorKind::RegionNotFound);
    }

    #[test]
    fn test_grid_error_kinds() {
        let empty = PipelineError::Interpolation(GridError::EmptyPointSet);
        assert_eq!(empty.stage(), Stage::Interpolation);
        assert_eq!(empty.kind(), ErrorKind::EmptyPointSet);

        let degenerate = PipelineError::Interpolation(GridError::degenerate(2, "too few"));
        assert_eq!(degenerate.kind(), ErrorKind::DegenerateGeometry);
    }

    #[test]
    fn test_shape_mismatch_kind() {
        let err = PipelineError::from(IngestionError::shape_mismatch("g.nc", 3, 2, 3));
        assert_eq!(err.stage(), Stage::Collection);
        assert_eq!(err.kind(), ErrorKind::InputShapeMismatch);
        assert!(err.to_string().contains("g.nc"));
    }
}
