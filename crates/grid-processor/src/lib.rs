//! Grid Processing: scattered observations to a masked regular grid
//!
//! This crate turns a filtered set of irregularly placed observations into
//! a regular lat/lon raster and re-masks that raster against the study
//! region.
//!
//! # Architecture
//!
//! ```text
//! FilteredPointSet
//!      │
//!      ▼
//! ScatteredInterpolator::interpolate
//!      │
//!      ├─► Guard: empty set, < 3 distinct positions, collinear positions
//!      │
//!      ├─► GridSpec over the points' extent (nx × ny, default 200 × 200)
//!      │
//!      └─► Linear: Delaunay triangulation + barycentric weights
//!          Nearest: R-tree nearest neighbour
//!               │
//!               ▼
//!          (GridMesh, GriddedField)   NaN outside the convex hull
//!               │
//!               ▼
//! GridMasker::apply(boundary)
//!      │
//!      ├─► Every cell re-tested against the region union → NaN outside
//!      │
//!      └─► Negative cells clamped to 0
//! ```
//!
//! # Example
//!
//! ```
//! use geo_common::{FilteredPointSet, ObservationPoint};
//! use grid_processor::{GridMasker, RegridConfig, ScatteredInterpolator};
//! use region::{EdgePolicy, RegionBoundary};
//!
//! let boundary = RegionBoundary::from_wkt("POLYGON((0 0, 1 0, 1 1, 0 1, 0 0))").unwrap();
//! let points: FilteredPointSet = [
//!     ObservationPoint::new(10.0, 0.0, 0.0),
//!     ObservationPoint::new(20.0, 1.0, 0.0),
//!     ObservationPoint::new(-5.0, 0.0, 1.0),
//! ]
//! .iter()
//! .collect();
//!
//! let config = RegridConfig { nx: 11, ny: 11, ..RegridConfig::default() };
//! let (mesh, field) = ScatteredInterpolator::from_config(&config)
//!     .interpolate(&points)
//!     .unwrap();
//! let masked = GridMasker::from_config(&config).apply(&mesh, &field, &boundary).unwrap();
//! assert!(masked.data.iter().all(|v| v.is_nan() || *v >= 0.0));
//! ```

pub mod config;
pub mod error;
pub mod interpolation;
pub mod mask;
pub mod triangulation;
pub mod types;

// Re-export commonly used types at crate root
pub use config::RegridConfig;
pub use error::{GridError, Result};
pub use interpolation::ScatteredInterpolator;
pub use mask::{GridMasker, MaskSummary};
pub use triangulation::{check_non_degenerate, Triangulation};
pub use types::InterpolationMethod;
